//! Hybrid Orchestrator, per SPEC_FULL.md §4.10. Runs a reduced-budget GA
//! for broad exploration, then seeds Simulated Annealing with the GA's
//! best solution for refinement (SPEC_FULL.md §9 resolves spec.md's open
//! question on seeding in favour of seeding, since monotone
//! best-tracking makes it strictly non-harmful). Returns whichever phase
//! ends with the lower monetary cost; on exact ties the earlier
//! candidate (the GA phase) wins, per spec.md's reproducibility rule.

use tracing::{info, span, Level};

use crate::cancellation::CancellationToken;
use crate::config::hybrid as cfg;
use crate::domain::context::ProblemContext;
use crate::domain::request::Parameters;
use crate::engines::{ga, sa, EngineResult};
use crate::evaluation::cost;

pub fn run(
    ctx: &ProblemContext,
    params: &Parameters,
    seed: u64,
    cancel: &CancellationToken,
) -> EngineResult {
    let span = span!(Level::INFO, "hybrid");
    let _guard = span.enter();

    let ga_params = Parameters {
        population_size: Some(
            params
                .population_size
                .unwrap_or(cfg::GA_POPULATION_SIZE),
        ),
        generations: Some(params.generations.unwrap_or(cfg::GA_GENERATIONS)),
        mutation_rate: params.mutation_rate,
        elite_size: params.elite_size,
        ..Parameters::default()
    };
    let ga_result = ga::run(ctx, &ga_params, seed, cancel);
    let ga_cost = cost(&ga_result.solution);
    info!(ga_cost, ga_iterations = ga_result.iterations, "ga phase complete");

    if ga_result.cancelled {
        return EngineResult {
            solution: ga_result.solution,
            iterations: ga_result.iterations,
            cancelled: true,
        };
    }

    let sa_params = Parameters {
        temperature: Some(
            params
                .temperature
                .unwrap_or(cfg::SA_INITIAL_TEMPERATURE),
        ),
        cooling_rate: Some(params.cooling_rate.unwrap_or(cfg::SA_COOLING_RATE)),
        ..Parameters::default()
    };
    let sa_result = sa::run(
        ctx,
        &sa_params,
        seed,
        cancel,
        Some(ga_result.solution.clone()),
    );
    let sa_cost = cost(&sa_result.solution);
    info!(sa_cost, sa_iterations = sa_result.iterations, "sa phase complete");

    let total_iterations = ga_result.iterations + sa_result.iterations;
    let cancelled = ga_result.cancelled || sa_result.cancelled;

    // Strict less-than: on an exact tie the earlier candidate (GA) wins,
    // matching spec.md's reproducibility rule for competing best-tracking.
    let solution = if sa_cost < ga_cost {
        sa_result.solution
    } else {
        ga_result.solution
    };

    EngineResult {
        solution,
        iterations: total_iterations,
        cancelled,
    }
}
