//! Fitness and cost functions, per SPEC_FULL.md §4.3. `fitness` is a
//! maximisation score used by GA/ACO selection pressure; `cost` is the
//! dual minimisation scalar SA and Tabu descend on. Both are pure
//! functions of a [`Solution`] — neither touches the network or a clock.

use crate::config::fitness as cfg;
use crate::domain::request::Objectives;
use crate::domain::solution::Solution;

/// Maximisation fitness in `[0, +inf)`. Higher is better. `fleet_size` is
/// the number of vehicles offered in the request (not just those used),
/// so the vehicle-score component rewards solutions that need fewer of
/// them.
pub fn fitness(solution: &Solution, objectives: &Objectives, fleet_size: usize) -> f64 {
    let distance_score =
        objectives.minimize_distance * (cfg::DISTANCE_NUMERATOR / (1.0 + solution.total_distance_km()));
    let time_score =
        objectives.minimize_time * (cfg::TIME_NUMERATOR / (1.0 + solution.total_time_minutes()));
    let cost_score = objectives.minimize_cost * (cfg::COST_NUMERATOR / (1.0 + solution.total_cost()));

    let routes_used = solution.vehicles_used() as f64;
    let vehicle_score = objectives.minimize_vehicles
        * (fleet_size as f64 - routes_used + 1.0)
        * cfg::VEHICLE_SCORE_FACTOR;

    let balance_score = objectives.balance_routes
        * solution.mean_utilization_pct()
        * cfg::BALANCE_SCORE_FACTOR;

    let violation_penalty = cfg::VIOLATION_PENALTY * solution.total_violations() as f64;

    (distance_score + time_score + cost_score + vehicle_score + balance_score - violation_penalty)
        .max(0.0)
}

/// Minimisation cost: total monetary cost plus the same violation
/// penalty as [`fitness`], but never discounted by objective weights —
/// SA and Tabu need a single scalar to descend regardless of which
/// objectives the caller emphasised.
pub fn cost(solution: &Solution) -> f64 {
    solution.total_cost() + cfg::VIOLATION_PENALTY * solution.total_violations() as f64
}
