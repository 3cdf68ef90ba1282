//! Route evaluator: walks a candidate stop sequence and produces
//! [`RouteMetrics`] plus any [`Violation`]s. Pure, deterministic, and
//! thread-safe — never mutates its inputs, so it is safe to call from a
//! `rayon` worker closure without synchronization.

use crate::domain::context::ProblemContext;
use crate::domain::solution::Solution;
use crate::domain::types::{
    Demand, LocationId, RouteMetrics, Severity, StopTiming, Violation, ViolationKind,
};

/// Re-runs [`evaluate_route`] for every route in `solution`, in place.
/// Engines call this after a move operator changes stop sequences —
/// moves themselves never touch metrics, so a solution is only as fresh
/// as its last evaluation.
pub fn evaluate_solution(ctx: &ProblemContext, solution: &mut Solution) {
    for route in &mut solution.routes {
        let evaluated = evaluate_route(ctx, route.vehicle_id, &route.stops);
        route.timings = evaluated.timings;
        route.metrics = evaluated.metrics;
        route.violations = evaluated.violations;
    }
}

pub struct EvaluatedRoute {
    pub metrics: RouteMetrics,
    pub timings: Vec<StopTiming>,
    pub violations: Vec<Violation>,
}

/// Walks `stops` in order for the given vehicle, from the depot back to
/// the depot (or the vehicle's own end coordinate), per SPEC_FULL.md §4.2.
pub fn evaluate_route(
    ctx: &ProblemContext,
    vehicle_id: u64,
    stops: &[LocationId],
) -> EvaluatedRoute {
    let vehicle = ctx.vehicle(vehicle_id);
    let mut timings = Vec::with_capacity(stops.len());
    let mut violations = Vec::new();

    let mut clock = vehicle.available_from;
    let mut load = Demand::ZERO;
    let mut total_distance = 0.0;
    let mut previous: Option<LocationId> = None;

    for &stop_id in stops {
        let location = ctx.location(stop_id);

        let leg_distance = match previous {
            Some(prev) => ctx.distance_between(prev, stop_id),
            None => ctx.distance_from_depot(stop_id),
        };
        total_distance += leg_distance;

        let travel_minutes = (leg_distance / vehicle.speed_kmh) * 60.0;
        let arrival = clock + travel_minutes;

        let wait = location
            .time_window
            .map(|tw| tw.wait_time(arrival))
            .unwrap_or(0.0);
        let start_of_service = arrival + wait;

        if let Some(tw) = location.time_window {
            if tw.is_missed(start_of_service) {
                violations.push(Violation::error(
                    ViolationKind::TimeWindowMissed,
                    format!(
                        "location {} serviced at {:.1} after window closes at {:.1}",
                        stop_id, start_of_service, tw.latest
                    ),
                ));
            }
        }

        let service = location.service_time_minutes;
        let departure = start_of_service + service;
        clock = departure;

        load += location.demand;
        if !vehicle.capacity.fits(load) {
            violations.push(Violation::error(
                ViolationKind::CapacityExceeded,
                format!(
                    "cumulative load ({:.2}, {:.2}, {:.2}) exceeds vehicle {} capacity after location {}",
                    load.weight, load.volume, load.pallets, vehicle_id, stop_id
                ),
            ));
        }

        if let Some(required) = &location.requirements {
            let has_all = vehicle
                .features
                .as_ref()
                .map(|features| required.is_subset(features))
                .unwrap_or(required.is_empty());
            if !has_all {
                violations.push(Violation::error(
                    ViolationKind::FeatureRequirementUnmet,
                    format!(
                        "location {} requires a feature vehicle {} does not have",
                        stop_id, vehicle_id
                    ),
                ));
            }
        }

        timings.push(StopTiming {
            arrival,
            departure,
            wait,
            service,
            cumulative_load: load,
        });

        previous = Some(stop_id);
    }

    let return_distance = match previous {
        Some(last) => match vehicle.end {
            Some(end_coord) => ctx.distance_to_coordinate(last, end_coord),
            None => ctx.distance_from_depot(last),
        },
        None => 0.0,
    };
    total_distance += return_distance;
    let return_minutes = (return_distance / vehicle.speed_kmh) * 60.0;
    clock += return_minutes;

    let total_minutes = clock - vehicle.available_from;

    if clock > vehicle.available_until {
        violations.push(Violation::error(
            ViolationKind::VehicleAvailabilityMissed,
            format!(
                "vehicle {} returns at {:.1}, after its availability ends at {:.1}",
                vehicle_id, clock, vehicle.available_until
            ),
        ));
    }

    if let Some(max_time) = ctx.constraints.max_route_time {
        if total_minutes > max_time {
            violations.push(Violation::new(
                ViolationKind::RouteDurationExceeded,
                Severity::Error,
                format!(
                    "route duration {:.1} exceeds max_route_time {:.1}",
                    total_minutes, max_time
                ),
            ));
        }
    }
    if let Some(max_distance) = ctx.constraints.max_route_distance {
        if total_distance > max_distance {
            violations.push(Violation::new(
                ViolationKind::RouteDistanceExceeded,
                Severity::Error,
                format!(
                    "route distance {:.2} exceeds max_route_distance {:.2}",
                    total_distance, max_distance
                ),
            ));
        }
    }

    let total_cost = vehicle.fixed_cost
        + total_distance * vehicle.cost_per_km
        + (total_minutes / 60.0) * vehicle.cost_per_hour;

    let metrics = RouteMetrics {
        distance_km: total_distance,
        time_minutes: total_minutes,
        cost: total_cost,
        utilization_pct: vehicle.capacity.utilization_pct(load),
        stop_count: stops.len(),
    };

    EvaluatedRoute {
        metrics,
        timings,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::ProblemContext;
    use crate::domain::request::OptimizationRequest;
    use crate::domain::types::{Capacity, Coordinate, Demand, Location, Vehicle};

    fn loc(id: u64, lat: f64, lon: f64, demand: f64) -> Location {
        Location::new(id, format!("loc{id}"), Coordinate::new(lat, lon))
            .with_demand(Demand::new(demand, 0.1 * demand, demand))
    }

    #[test]
    fn single_vehicle_visits_three_stops_scenario_s1() {
        let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));
        let locations = vec![loc(1, 0.0, 1.0, 1.0), loc(2, 1.0, 0.0, 1.0), loc(3, 0.0, -1.0, 1.0)];
        let vehicle = Vehicle::new(1, Capacity::new(10.0, 1.0, 10.0), 60.0, Coordinate::new(0.0, 0.0))
            .with_costs(1.0, 10.0, 100.0);
        let req = OptimizationRequest::new(depot, locations, vec![vehicle]);
        let ctx = ProblemContext::build(&req);

        let result = evaluate_route(&ctx, 1, &[1, 2, 3]);
        assert!(result.violations.is_empty());
        // depot->(0,1)->(1,0)->(0,-1)->depot, each leg ~111.195 km, 4 legs.
        assert!((result.metrics.distance_km - 4.0 * 111.195).abs() < 1.0);
    }

    #[test]
    fn time_window_infeasibility_scenario_s3() {
        let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));
        // ~100km east of the depot at the equator.
        let far = Location::new(1, "far", Coordinate::new(0.0, 0.898_315))
            .with_time_window(crate::domain::types::TimeWindow::new(8.0 * 60.0, 8.5 * 60.0).unwrap());
        let vehicle = Vehicle::new(1, Capacity::new(100.0, 100.0, 100.0), 50.0, Coordinate::new(0.0, 0.0));
        let req = OptimizationRequest::new(depot, vec![far], vec![vehicle]);
        let ctx = ProblemContext::build(&req);

        let result = evaluate_route(&ctx, 1, &[1]);
        let missed: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.kind == ViolationKind::TimeWindowMissed)
            .collect();
        assert_eq!(missed.len(), 1);
    }

    #[test]
    fn capacity_exceeded_is_recorded() {
        let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));
        let locations = vec![loc(1, 0.0, 1.0, 20.0)];
        let vehicle = Vehicle::new(1, Capacity::new(5.0, 5.0, 5.0), 50.0, Coordinate::new(0.0, 0.0));
        let req = OptimizationRequest::new(depot, locations, vec![vehicle]);
        let ctx = ProblemContext::build(&req);

        let result = evaluate_route(&ctx, 1, &[1]);
        assert!(result
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::CapacityExceeded));
    }
}
