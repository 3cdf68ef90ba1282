//! Genetic Algorithm engine, per SPEC_FULL.md §4.6. A chromosome is a
//! permutation of every customer location id; decoding greedily splits
//! it into vehicle routes in chromosome order.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::cancellation::CancellationToken;
use crate::config::ga as cfg;
use crate::domain::context::ProblemContext;
use crate::domain::request::Parameters;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{Demand, LocationId};
use crate::engines::EngineResult;
use crate::evaluation::{evaluate_route, evaluate_solution, fitness};
use crate::moves::{order_crossover, swap_mutation};

type Chromosome = Vec<LocationId>;

fn finalize_route(ctx: &ProblemContext, vehicle_id: u64, stops: Vec<LocationId>) -> Route {
    let evaluated = evaluate_route(ctx, vehicle_id, &stops);
    Route {
        vehicle_id,
        stops,
        timings: evaluated.timings,
        metrics: evaluated.metrics,
        violations: evaluated.violations,
    }
}

/// Splits `chromosome` into one route per vehicle in fleet order. A
/// gene that would break the current vehicle's capacity closes that
/// vehicle's route and retries against the next; a gene that exhausts
/// every remaining vehicle (and everything after it) becomes
/// unassigned.
fn decode(ctx: &ProblemContext, chromosome: &[LocationId]) -> Solution {
    let mut routes = Vec::with_capacity(ctx.vehicles.len());
    let mut unassigned = Vec::new();
    let mut vehicle_idx = 0;
    let mut stops: Vec<LocationId> = Vec::new();
    let mut load = Demand::ZERO;

    for &gene in chromosome {
        let demand = ctx.location(gene).demand;
        while vehicle_idx < ctx.vehicles.len()
            && !ctx.vehicles[vehicle_idx].capacity.fits(load + demand)
        {
            routes.push(finalize_route(
                ctx,
                ctx.vehicles[vehicle_idx].id,
                std::mem::take(&mut stops),
            ));
            load = Demand::ZERO;
            vehicle_idx += 1;
        }
        if vehicle_idx >= ctx.vehicles.len() {
            unassigned.push(gene);
            continue;
        }
        stops.push(gene);
        load += demand;
    }

    while vehicle_idx < ctx.vehicles.len() {
        routes.push(finalize_route(
            ctx,
            ctx.vehicles[vehicle_idx].id,
            std::mem::take(&mut stops),
        ));
        vehicle_idx += 1;
    }

    Solution { routes, unassigned }
}

struct Individual {
    chromosome: Chromosome,
    solution: Solution,
    fitness: f64,
}

fn evaluate_individual(ctx: &ProblemContext, chromosome: Chromosome) -> Individual {
    let mut solution = decode(ctx, &chromosome);
    evaluate_solution(ctx, &mut solution);
    let score = fitness(&solution, &ctx.objectives, ctx.vehicles.len());
    Individual {
        chromosome,
        solution,
        fitness: score,
    }
}

/// Descending by fitness; ties keep input order (Rust's `sort_by` is
/// stable), which is how invariant 8 and the "older chromosome wins
/// ties" rule both fall out for free.
fn rank(population: &mut Vec<Individual>) {
    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(std::cmp::Ordering::Equal));
}

fn tournament_winner<'a>(
    population: &'a [Individual],
    rng: &mut ChaCha8Rng,
    tournament_size: usize,
) -> &'a Chromosome {
    let mut best: Option<&Individual> = None;
    for _ in 0..tournament_size {
        let idx = rng.gen_range(0..population.len());
        let candidate = &population[idx];
        best = match best {
            None => Some(candidate),
            Some(current) if candidate.fitness > current.fitness => Some(candidate),
            Some(current) => Some(current),
        };
    }
    &best.expect("tournament_size > 0").chromosome
}

pub fn run(
    ctx: &ProblemContext,
    params: &Parameters,
    seed: u64,
    cancel: &CancellationToken,
) -> EngineResult {
    run_tracking_history(ctx, params, seed, cancel).0
}

/// Same search as [`run`], but also returns the best-fitness-so-far
/// after every generation. Used by tests to verify invariant 8 (fitness
/// monotonicity) directly rather than by proxy.
fn run_tracking_history(
    ctx: &ProblemContext,
    params: &Parameters,
    seed: u64,
    cancel: &CancellationToken,
) -> (EngineResult, Vec<f64>) {
    let population_size = params.population_size.unwrap_or(cfg::POPULATION_SIZE).max(2);
    let generations = params.generations.unwrap_or(cfg::GENERATIONS);
    let mutation_rate = params.mutation_rate.unwrap_or(cfg::MUTATION_RATE);
    let elite_size = params
        .elite_size
        .unwrap_or(cfg::ELITE_SIZE)
        .min(population_size.saturating_sub(1));

    let span = span!(Level::INFO, "ga", population_size, generations, elite_size);
    let _guard = span.enter();

    let base_genes: Chromosome = ctx.location_ids();
    let mut controller = ChaCha8Rng::seed_from_u64(seed);

    let mut population: Vec<Individual> = (0..population_size)
        .map(|_| {
            let mut genes = base_genes.clone();
            genes.shuffle(&mut controller);
            genes
        })
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|genes| evaluate_individual(ctx, genes))
        .collect();
    rank(&mut population);

    let mut best = population[0].solution.clone();
    let mut best_fitness = population[0].fitness;
    let mut ran = 0;
    let mut cancelled = false;
    let mut history = vec![best_fitness];

    for generation in 0..generations {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        ran = generation + 1;

        let offspring_count = population_size - elite_size;
        let mut pool: Vec<Chromosome> = Vec::with_capacity(offspring_count);
        for _ in 0..offspring_count {
            pool.push(tournament_winner(&population, &mut controller, cfg::TOURNAMENT_SIZE).clone());
        }

        let tasks: Vec<(u64, usize, usize)> = (0..offspring_count)
            .map(|_| {
                (
                    controller.gen::<u64>(),
                    controller.gen_range(0..pool.len()),
                    controller.gen_range(0..pool.len()),
                )
            })
            .collect();

        let mut offspring: Vec<Individual> = tasks
            .into_par_iter()
            .map(|(child_seed, a, b)| {
                let mut child_rng = ChaCha8Rng::seed_from_u64(child_seed);
                let mut genes = order_crossover(&pool[a], &pool[b], &mut child_rng);
                if child_rng.gen::<f64>() < mutation_rate {
                    swap_mutation(&mut genes, &mut child_rng);
                }
                evaluate_individual(ctx, genes)
            })
            .collect();

        let mut next_generation: Vec<Individual> = population.drain(0..elite_size).collect();
        next_generation.append(&mut offspring);
        population = next_generation;
        rank(&mut population);

        if population[0].fitness > best_fitness {
            best_fitness = population[0].fitness;
            best = population[0].solution.clone();
            debug!(generation, best_fitness, "new best");
        }
        history.push(best_fitness);
    }

    info!(iterations = ran, best_fitness, "ga finished");
    (
        EngineResult {
            solution: best,
            iterations: ran,
            cancelled,
        },
        history,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::OptimizationRequest;
    use crate::domain::types::{Capacity, Coordinate, Location, Vehicle};

    fn scenario_s1() -> ProblemContext {
        let depot = Location::new(0, "depot", Coordinate::new(0.0, 0.0));
        let locations = vec![
            Location::new(1, "a", Coordinate::new(0.0, 1.0))
                .with_demand(Demand::new(1.0, 0.1, 1.0)),
            Location::new(2, "b", Coordinate::new(1.0, 0.0))
                .with_demand(Demand::new(1.0, 0.1, 1.0)),
            Location::new(3, "c", Coordinate::new(0.0, -1.0))
                .with_demand(Demand::new(1.0, 0.1, 1.0)),
        ];
        let vehicle = Vehicle::new(1, Capacity::new(10.0, 1.0, 10.0), 60.0, Coordinate::new(0.0, 0.0))
            .with_costs(1.0, 10.0, 100.0);
        let req = OptimizationRequest::new(depot, locations, vec![vehicle]);
        ProblemContext::build(&req)
    }

    #[test]
    fn decode_assigns_every_gene_when_capacity_allows() {
        let ctx = scenario_s1();
        let solution = decode(&ctx, &[1, 2, 3]);
        assert!(solution.unassigned.is_empty());
        assert_eq!(solution.served_count(), 3);
    }

    #[test]
    fn same_seed_yields_identical_solutions_scenario_s4() {
        let ctx = scenario_s1();
        let params = Parameters {
            population_size: Some(10),
            generations: Some(5),
            ..Parameters::default()
        };
        let cancel = CancellationToken::new();
        let first = run(&ctx, &params, 42, &cancel);
        let second = run(&ctx, &params, 42, &cancel);
        assert_eq!(first.solution, second.solution);
    }

    #[test]
    fn best_fitness_never_decreases_across_generations() {
        let ctx = scenario_s1();
        let params = Parameters {
            population_size: Some(12),
            generations: Some(15),
            ..Parameters::default()
        };
        let cancel = CancellationToken::new();
        let (_, history) = run_tracking_history(&ctx, &params, 7, &cancel);
        assert!(history.windows(2).all(|w| w[1] >= w[0]));
    }

    proptest::proptest! {
        /// Invariant 8: across arbitrary seeds and population/generation
        /// sizes, the tracked best fitness is non-decreasing generation
        /// over generation — elitism must never let it regress.
        #[test]
        fn fitness_history_is_non_decreasing_for_any_seed(
            seed in proptest::prelude::any::<u64>(),
            population_size in 4usize..20,
            generations in 1usize..20,
        ) {
            let ctx = scenario_s1();
            let params = Parameters {
                population_size: Some(population_size),
                generations: Some(generations),
                ..Parameters::default()
            };
            let cancel = CancellationToken::new();
            let (_, history) = run_tracking_history(&ctx, &params, seed, &cancel);
            proptest::prop_assert!(history.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}
