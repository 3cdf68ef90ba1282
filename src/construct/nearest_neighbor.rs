//! Constructive heuristic: greedy nearest-neighbour route building, per
//! SPEC_FULL.md §4.4. Used standalone as the Tabu/SA starting point and
//! as a seed for GA/ACO populations.

use std::collections::HashSet;

use crate::domain::context::ProblemContext;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{Demand, LocationId};
use crate::evaluation::evaluate_route;

/// Builds a feasible initial [`Solution`] by repeatedly appending the
/// nearest capacity-feasible unassigned location to the current
/// vehicle's route, advancing to the next vehicle once none fits.
/// Locations left over once the fleet is exhausted are reported as
/// `unassigned`.
pub fn construct(ctx: &ProblemContext) -> Solution {
    let mut unassigned: HashSet<LocationId> = ctx.location_ids().into_iter().collect();
    let mut routes = Vec::with_capacity(ctx.vehicles.len());

    for vehicle in &ctx.vehicles {
        let mut stops: Vec<LocationId> = Vec::new();
        let mut load = Demand::ZERO;
        let mut current: Option<LocationId> = None;

        loop {
            let candidate = unassigned
                .iter()
                .copied()
                .filter(|&id| {
                    let demand = ctx.location(id).demand;
                    vehicle.capacity.fits(load + demand)
                })
                .min_by(|&a, &b| {
                    let da = match current {
                        Some(cur) => ctx.distance_between(cur, a),
                        None => ctx.distance_from_depot(a),
                    };
                    let db = match current {
                        Some(cur) => ctx.distance_between(cur, b),
                        None => ctx.distance_from_depot(b),
                    };
                    da.partial_cmp(&db)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.cmp(&b))
                });

            let Some(next_id) = candidate else { break };
            unassigned.remove(&next_id);
            load += ctx.location(next_id).demand;
            stops.push(next_id);
            current = Some(next_id);
        }

        let evaluated = evaluate_route(ctx, vehicle.id, &stops);
        routes.push(Route {
            vehicle_id: vehicle.id,
            stops,
            timings: evaluated.timings,
            metrics: evaluated.metrics,
            violations: evaluated.violations,
        });

        if unassigned.is_empty() {
            break;
        }
    }

    let mut unassigned: Vec<LocationId> = unassigned.into_iter().collect();
    unassigned.sort_unstable();

    Solution { routes, unassigned }
}
