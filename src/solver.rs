//! Solver Entry, per SPEC_FULL.md §4.11. The single public operation:
//! validate the request, dispatch on `request.algorithm`, run the
//! selected engine, and assemble the externally-visible result. No
//! operation is retried; only request validation and true internal
//! errors abort the solve (SPEC_FULL.md §7).

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::quality as cfg;
use crate::domain::context::ProblemContext;
use crate::domain::request::OptimizationRequest;
use crate::domain::solution::Solution;
use crate::domain::types::{AlgorithmTag, LocationId};
use crate::engines::{aco, ga, hybrid, sa, tabu};
use crate::error::SolveError;
use crate::events::{completion_payload, EventSink};

pub use crate::cancellation::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Summary {
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub total_cost: f64,
    pub vehicles_used: usize,
    pub vehicles_available: usize,
    pub mean_utilization_pct: f64,
    pub locations_served: usize,
    pub locations_total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub solution_quality: f64,
    pub convergence_rate: f64,
    pub diversity_index: f64,
    pub balance_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub routes: Vec<crate::domain::solution::Route>,
    pub unassigned_locations: Vec<LocationId>,
    pub summary: Summary,
    pub algorithm: AlgorithmTag,
    pub iterations: usize,
    pub computation_time_seconds: f64,
    pub quality_metrics: QualityMetrics,
    pub cancelled: bool,
}

fn balance_score(mean_utilization_pct: f64) -> f64 {
    (100.0 - (mean_utilization_pct - cfg::BALANCE_TARGET_UTILIZATION).abs()).max(0.0)
}

fn summarize(solution: &Solution, locations_total: usize, vehicles_available: usize) -> Summary {
    Summary {
        total_distance_km: solution.total_distance_km(),
        total_time_minutes: solution.total_time_minutes(),
        total_cost: solution.total_cost(),
        vehicles_used: solution.vehicles_used(),
        vehicles_available,
        mean_utilization_pct: solution.mean_utilization_pct(),
        locations_served: solution.served_count(),
        locations_total,
    }
}

fn assemble(
    algorithm: AlgorithmTag,
    solution: Solution,
    iterations: usize,
    cancelled: bool,
    started: Instant,
    locations_total: usize,
    vehicles_available: usize,
    diversity_index: f64,
) -> OptimizationResult {
    let summary = summarize(&solution, locations_total, vehicles_available);
    let solution_quality = if locations_total == 0 {
        100.0
    } else {
        (100.0 * summary.locations_served as f64 / locations_total as f64).min(100.0)
    };

    // 3-decimal precision per spec.md §4.11.
    let computation_time_seconds = (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0;

    OptimizationResult {
        routes: solution.routes,
        unassigned_locations: solution.unassigned,
        summary,
        algorithm,
        iterations,
        computation_time_seconds,
        quality_metrics: QualityMetrics {
            solution_quality,
            convergence_rate: cfg::CONVERGENCE_RATE,
            diversity_index,
            balance_score: balance_score(summary.mean_utilization_pct),
        },
        cancelled,
    }
}

/// Dispatches on `request.algorithm`, runs the selected engine to
/// completion (or cancellation), and emits `route.optimization.completed`
/// on `sink` before returning. Fatal per spec.md §7: `InvalidRequest`
/// (negative capacity, non-finite coordinates, all-zero objectives) and
/// `Internal` (never raised by a feasible request; reserved for broken
/// invariants). Infeasibility, violations, and cancellation are surfaced
/// as data on a successful result, never as an `Err`.
#[instrument(skip(request, cancel, sink), fields(algorithm = ?request.algorithm))]
pub async fn optimize(
    request: OptimizationRequest,
    rng_seed: u64,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) -> Result<OptimizationResult, SolveError> {
    request.validate()?;

    let started = Instant::now();
    let algorithm = request.algorithm;
    let locations_total = request.locations.len();
    let vehicles_available = request.vehicles.len();

    if locations_total == 0 {
        let result = assemble(
            algorithm,
            Solution::new(),
            0,
            false,
            started,
            0,
            vehicles_available,
            cfg::DIVERSITY_INDEX,
        );
        emit_completion(sink, &result);
        return Ok(result);
    }

    if vehicles_available == 0 {
        let mut unassigned: Vec<LocationId> = request.locations.iter().map(|l| l.id).collect();
        unassigned.sort_unstable();
        let result = assemble(
            algorithm,
            Solution {
                routes: Vec::new(),
                unassigned,
            },
            0,
            false,
            started,
            locations_total,
            0,
            cfg::DIVERSITY_INDEX,
        );
        emit_completion(sink, &result);
        return Ok(result);
    }

    let ctx = ProblemContext::build(&request);
    let params = request.parameters;

    let (engine_result, diversity_index) = match algorithm {
        AlgorithmTag::Genetic => (ga::run(&ctx, &params, rng_seed, &cancel), cfg::DIVERSITY_INDEX),
        AlgorithmTag::AntColony => (aco::run(&ctx, &params, rng_seed, &cancel), cfg::DIVERSITY_INDEX),
        AlgorithmTag::SimulatedAnnealing => {
            (sa::run(&ctx, &params, rng_seed, &cancel, None), cfg::DIVERSITY_INDEX)
        }
        AlgorithmTag::Tabu => (tabu::run(&ctx, &params, rng_seed, &cancel), cfg::DIVERSITY_INDEX),
        AlgorithmTag::Hybrid => (
            hybrid::run(&ctx, &params, rng_seed, &cancel),
            cfg::HYBRID_DIVERSITY_INDEX,
        ),
    };

    let result = assemble(
        algorithm,
        engine_result.solution,
        engine_result.iterations,
        engine_result.cancelled,
        started,
        locations_total,
        vehicles_available,
        diversity_index,
    );

    info!(
        algorithm = algorithm.as_str(),
        iterations = result.iterations,
        computation_time_seconds = result.computation_time_seconds,
        "solve complete"
    );

    emit_completion(sink, &result);
    Ok(result)
}

fn emit_completion(sink: &dyn EventSink, result: &OptimizationResult) {
    let payload = completion_payload(
        result.algorithm.as_str(),
        result.summary.locations_total,
        result.summary.vehicles_used,
        result.summary.total_distance_km,
        result.computation_time_seconds,
    );
    sink.emit("route.optimization.completed", payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Capacity, Coordinate, Demand, Location, Vehicle};
    use crate::events::NullEventSink;

    fn depot() -> Location {
        Location::new(0, "depot", Coordinate::new(0.0, 0.0))
    }

    #[tokio::test]
    async fn zero_locations_returns_quality_100() {
        let req = OptimizationRequest::new(depot(), vec![], vec![]);
        let result = optimize(req, 1, CancellationToken::new(), &NullEventSink)
            .await
            .expect("valid request");
        assert_eq!(result.quality_metrics.solution_quality, 100.0);
        assert!(result.routes.is_empty());
    }

    #[tokio::test]
    async fn empty_fleet_returns_all_unassigned_and_quality_0() {
        let loc = Location::new(1, "a", Coordinate::new(1.0, 1.0)).with_demand(Demand::new(1.0, 1.0, 1.0));
        let req = OptimizationRequest::new(depot(), vec![loc], vec![]);
        let result = optimize(req, 1, CancellationToken::new(), &NullEventSink)
            .await
            .expect("valid request");
        assert_eq!(result.quality_metrics.solution_quality, 0.0);
        assert_eq!(result.unassigned_locations, vec![1]);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_engine_runs() {
        let loc = Location::new(1, "a", Coordinate::new(f64::NAN, 1.0));
        let req = OptimizationRequest::new(depot(), vec![loc], vec![]);
        let result = optimize(req, 1, CancellationToken::new(), &NullEventSink).await;
        assert!(matches!(result, Err(SolveError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn trivial_single_vehicle_scenario_s1() {
        let locations = vec![
            Location::new(1, "a", Coordinate::new(0.0, 1.0)).with_demand(Demand::new(1.0, 0.1, 1.0)),
            Location::new(2, "b", Coordinate::new(1.0, 0.0)).with_demand(Demand::new(1.0, 0.1, 1.0)),
            Location::new(3, "c", Coordinate::new(0.0, -1.0)).with_demand(Demand::new(1.0, 0.1, 1.0)),
        ];
        let vehicle = Vehicle::new(1, Capacity::new(10.0, 1.0, 10.0), 60.0, Coordinate::new(0.0, 0.0))
            .with_costs(1.0, 10.0, 100.0);
        let req = OptimizationRequest::new(depot(), locations, vec![vehicle])
            .with_algorithm(AlgorithmTag::Tabu);
        let result = optimize(req, 42, CancellationToken::new(), &NullEventSink)
            .await
            .expect("valid request");
        assert!(result.unassigned_locations.is_empty());
        assert!((result.summary.total_distance_km - 4.0 * 111.195).abs() < 5.0);
    }
}
