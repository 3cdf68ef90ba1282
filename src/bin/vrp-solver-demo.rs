//! Demo binary: builds a synthetic problem, solves it with each
//! algorithm tag, and prints a summary. Mirrors the teacher's
//! `bin/vrp-solver.rs` + `main.rs` structure (tracing subscriber init,
//! then a single call into the library's search entry point) but
//! dispatches across all five algorithms instead of hard-coding Tabu.

use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vrp_solver::domain::types::AlgorithmTag;
use vrp_solver::fixtures::synthetic_request;
use vrp_solver::{optimize, CancellationToken, NullEventSink};

const LOCATION_COUNT: usize = 20;
const VEHICLE_COUNT: usize = 4;
const SEED: u64 = 42;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    info!(
        "Starting VRP solver demo with {} locations and {} vehicles",
        LOCATION_COUNT, VEHICLE_COUNT
    );

    let algorithms = [
        AlgorithmTag::Genetic,
        AlgorithmTag::AntColony,
        AlgorithmTag::SimulatedAnnealing,
        AlgorithmTag::Tabu,
        AlgorithmTag::Hybrid,
    ];

    for algorithm in algorithms {
        let span = span!(Level::INFO, "demo_run", algorithm = algorithm.as_str());
        let _guard = span.enter();

        let request = synthetic_request(LOCATION_COUNT, VEHICLE_COUNT, 2.0, SEED, algorithm);
        let result = optimize(request, SEED, CancellationToken::new(), &NullEventSink).await?;

        println!(
            "{:>20}: vehicles {}/{}  distance {:8.2} km  cost {:8.2}  served {}/{}  quality {:5.1}  ({} iterations, {:.3}s)",
            algorithm.as_str(),
            result.summary.vehicles_used,
            result.summary.vehicles_available,
            result.summary.total_distance_km,
            result.summary.total_cost,
            result.summary.locations_served,
            result.summary.locations_total,
            result.quality_metrics.solution_quality,
            result.iterations,
            result.computation_time_seconds,
        );
    }

    Ok(())
}
