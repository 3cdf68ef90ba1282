//! ALNS-style destroy-and-recreate repair for over-capacity routes.
//!
//! Grounded in the teacher's `solver/tabu_search/repair.rs::alns_destroy_and_recreate`:
//! pop overloaded stops into a max-heap by demand, reinsert into
//! underfilled vehicles, spill any remainder into the least-overloaded
//! vehicle. Generalised here from the teacher's single scalar demand to
//! the three-component `Demand`/`Capacity` model. A strengthening of
//! SPEC_FULL.md's "violations add a penalty" model: repair runs first,
//! and only genuine residual overflow is left for the evaluator to catch
//! as a recorded `capacity-exceeded` violation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::context::ProblemContext;
use crate::domain::solution::Solution;
use crate::domain::types::{Demand, LocationId};

fn magnitude(d: Demand) -> f64 {
    d.weight + d.volume + d.pallets
}

fn route_load(ctx: &ProblemContext, stops: &[LocationId]) -> Demand {
    let mut load = Demand::ZERO;
    for &id in stops {
        load += ctx.location(id).demand;
    }
    load
}

fn excess(ctx: &ProblemContext, vehicle_id: u64, stops: &[LocationId]) -> f64 {
    let vehicle = ctx.vehicle(vehicle_id);
    let load = route_load(ctx, stops);
    (load.weight - vehicle.capacity.weight).max(0.0)
        + (load.volume - vehicle.capacity.volume).max(0.0)
        + (load.pallets - vehicle.capacity.pallets).max(0.0)
}

struct HeapItem {
    id: LocationId,
    demand_magnitude: f64,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.demand_magnitude == other.demand_magnitude
    }
}
impl Eq for HeapItem {}
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.demand_magnitude
            .partial_cmp(&other.demand_magnitude)
            .unwrap_or(Ordering::Equal)
    }
}

/// Destroys stops off the back of every over-capacity route into a
/// max-heap (highest demand first), then recreates by reinserting into
/// routes with spare capacity (most room first), spilling any remainder
/// into the route with the least excess. A no-op if nothing is
/// over-capacity.
pub fn repair_capacity(ctx: &ProblemContext, solution: &mut Solution) {
    if solution.routes.is_empty() {
        return;
    }

    let mut heap = BinaryHeap::new();
    for route in &mut solution.routes {
        let mut route_excess = excess(ctx, route.vehicle_id, &route.stops);
        while route_excess > 0.0 {
            let Some(stop) = route.stops.pop() else {
                break;
            };
            let demand = ctx.location(stop).demand;
            heap.push(HeapItem {
                id: stop,
                demand_magnitude: magnitude(demand),
            });
            route_excess = excess(ctx, route.vehicle_id, &route.stops);
        }
    }

    if heap.is_empty() {
        return;
    }

    let mut order: Vec<usize> = (0..solution.routes.len()).collect();
    order.sort_by(|&a, &b| {
        excess(ctx, solution.routes[a].vehicle_id, &solution.routes[a].stops)
            .partial_cmp(&excess(
                ctx,
                solution.routes[b].vehicle_id,
                &solution.routes[b].stops,
            ))
            .unwrap_or(Ordering::Equal)
    });

    for &idx in &order {
        if heap.is_empty() {
            break;
        }
        loop {
            let Some(top) = heap.peek() else { break };
            let vehicle = ctx.vehicle(solution.routes[idx].vehicle_id);
            let load = route_load(ctx, &solution.routes[idx].stops);
            let candidate_demand = ctx.location(top.id).demand;
            if vehicle.capacity.fits(load + candidate_demand) {
                let item = heap.pop().expect("peeked Some above");
                solution.routes[idx].stops.push(item.id);
            } else {
                break;
            }
        }
    }

    if !heap.is_empty() {
        if let Some(&idx) = order.first() {
            for item in heap.into_sorted_vec() {
                solution.routes[idx].stops.push(item.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::OptimizationRequest;
    use crate::domain::solution::Route;
    use crate::domain::types::{Capacity, Coordinate, Location, Vehicle};

    fn ctx_with_two_vehicles() -> ProblemContext {
        let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));
        let locations: Vec<Location> = (1..=6)
            .map(|i| {
                Location::new(i, format!("l{i}"), Coordinate::new(0.0, i as f64 * 0.1))
                    .with_demand(Demand::new(4.0, 4.0, 4.0))
            })
            .collect();
        let vehicles = vec![
            Vehicle::new(1, Capacity::new(10.0, 10.0, 10.0), 50.0, Coordinate::new(0.0, 0.0)),
            Vehicle::new(2, Capacity::new(10.0, 10.0, 10.0), 50.0, Coordinate::new(0.0, 0.0)),
        ];
        let req = OptimizationRequest::new(depot, locations, vehicles);
        ProblemContext::build(&req)
    }

    #[test]
    fn repair_clears_overload_when_capacity_exists_elsewhere() {
        let ctx = ctx_with_two_vehicles();
        let mut solution = Solution {
            routes: vec![
                Route::new(1, vec![1, 2, 3]), // 12 > capacity 10, 4 dem each
                Route::new(2, vec![]),
            ],
            unassigned: vec![],
        };
        repair_capacity(&ctx, &mut solution);
        assert!(excess(&ctx, 1, &solution.routes[0].stops) <= 0.0);
        assert!(excess(&ctx, 2, &solution.routes[1].stops) <= 0.0);
        let total_stops: usize = solution.routes.iter().map(|r| r.stops.len()).sum();
        assert_eq!(total_stops, 3);
    }

    #[test]
    fn repair_is_a_no_op_when_nothing_is_overloaded() {
        let ctx = ctx_with_two_vehicles();
        let mut solution = Solution {
            routes: vec![Route::new(1, vec![1]), Route::new(2, vec![2])],
            unassigned: vec![],
        };
        let before = solution.clone();
        repair_capacity(&ctx, &mut solution);
        assert_eq!(before, solution);
    }
}
