//! Ant Colony Optimization engine, per SPEC_FULL.md §4.7. Ants
//! construct routes by sampling proportional to `pheromone^alpha *
//! visibility^beta`; pheromone evaporates and is deposited between
//! iterations. The pheromone matrix is indexed depot-inclusive (index 0
//! is the depot, same convention as [`crate::geometry::DistanceMatrix`]),
//! which resolves spec.md's open question about first-leg visibility:
//! there is no -1 sentinel here, the depot row already carries pheromone
//! history for the first leg.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::cancellation::CancellationToken;
use crate::config::aco as cfg;
use crate::domain::context::ProblemContext;
use crate::domain::request::Parameters;
use crate::domain::solution::{Route, Solution};
use crate::domain::types::{Demand, LocationId};
use crate::engines::EngineResult;
use crate::evaluation::{evaluate_route, evaluate_solution, fitness};

/// Dense pheromone matrix over matrix indices (depot + locations), same
/// addressing as [`crate::geometry::DistanceMatrix`].
struct PheromoneMatrix {
    n: usize,
    trail: Vec<f64>,
}

impl PheromoneMatrix {
    fn new(n: usize) -> Self {
        Self {
            n,
            trail: vec![cfg::INITIAL_PHEROMONE; n * n],
        }
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        self.trail[i * self.n + j]
    }

    fn evaporate(&mut self) {
        for v in &mut self.trail {
            *v *= 1.0 - cfg::EVAPORATION;
        }
    }

    fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        self.trail[i * self.n + j] += amount;
        self.trail[j * self.n + i] += amount;
    }
}

/// One ant's construction: starts at the depot, fills the current
/// vehicle's route by probabilistic selection among capacity-feasible
/// unvisited locations, opening the next vehicle's route when none fit.
fn construct_ant_solution(
    ctx: &ProblemContext,
    pheromone: &PheromoneMatrix,
    rng: &mut ChaCha8Rng,
) -> Solution {
    let mut unvisited: Vec<LocationId> = ctx.location_ids();
    let mut routes = Vec::with_capacity(ctx.vehicles.len());

    for vehicle in &ctx.vehicles {
        let mut stops: Vec<LocationId> = Vec::new();
        let mut load = Demand::ZERO;
        let mut current_index = ProblemContext::DEPOT_INDEX;

        loop {
            let feasible: Vec<LocationId> = unvisited
                .iter()
                .copied()
                .filter(|&id| vehicle.capacity.fits(load + ctx.location(id).demand))
                .collect();
            if feasible.is_empty() {
                break;
            }

            let weights: Vec<f64> = feasible
                .iter()
                .map(|&id| {
                    let j = ctx.matrix_index(id);
                    let tau = pheromone.get(current_index, j).powf(cfg::ALPHA);
                    let distance = ctx.distances.get(current_index, j);
                    let visibility = (1.0 / (distance + cfg::VISIBILITY_OFFSET)).powf(cfg::BETA);
                    tau * visibility
                })
                .collect();

            let total: f64 = weights.iter().sum();
            let next = if total <= 0.0 || !total.is_finite() {
                feasible[rng.gen_range(0..feasible.len())]
            } else {
                let mut draw = rng.gen::<f64>() * total;
                let mut chosen = *feasible.last().expect("feasible is non-empty");
                for (candidate, weight) in feasible.iter().zip(weights.iter()) {
                    if draw < *weight {
                        chosen = *candidate;
                        break;
                    }
                    draw -= weight;
                }
                chosen
            };

            unvisited.retain(|&id| id != next);
            load += ctx.location(next).demand;
            current_index = ctx.matrix_index(next);
            stops.push(next);
        }

        let evaluated = evaluate_route(ctx, vehicle.id, &stops);
        routes.push(Route {
            vehicle_id: vehicle.id,
            stops,
            timings: evaluated.timings,
            metrics: evaluated.metrics,
            violations: evaluated.violations,
        });

        if unvisited.is_empty() {
            break;
        }
    }

    Solution {
        routes,
        unassigned: unvisited,
    }
}

pub fn run(
    ctx: &ProblemContext,
    _params: &Parameters,
    seed: u64,
    cancel: &CancellationToken,
) -> EngineResult {
    let span = span!(Level::INFO, "aco", ants = cfg::NUM_ANTS, iterations = cfg::ITERATIONS);
    let _guard = span.enter();

    let matrix_size = ctx.locations.len() + 1;
    let mut pheromone = PheromoneMatrix::new(matrix_size);
    let mut controller = ChaCha8Rng::seed_from_u64(seed);

    let mut best: Option<Solution> = None;
    let mut best_fitness = f64::NEG_INFINITY;
    let mut iterations = 0usize;
    let mut cancelled = false;

    for iteration in 0..cfg::ITERATIONS {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        iterations = iteration + 1;

        let ant_seeds: Vec<u64> = (0..cfg::NUM_ANTS).map(|_| controller.gen()).collect();
        let mut ant_solutions: Vec<Solution> = ant_seeds
            .into_par_iter()
            .map(|s| {
                let mut ant_rng = ChaCha8Rng::seed_from_u64(s);
                let mut solution = construct_ant_solution(ctx, &pheromone, &mut ant_rng);
                evaluate_solution(ctx, &mut solution);
                solution
            })
            .collect();

        pheromone.evaporate();
        for solution in &ant_solutions {
            let total_distance = solution.total_distance_km();
            if total_distance <= 0.0 {
                continue;
            }
            let deposit_amount = cfg::DEPOSIT_FACTOR / total_distance;
            for route in &solution.routes {
                let mut prev = ProblemContext::DEPOT_INDEX;
                for &stop in &route.stops {
                    let idx = ctx.matrix_index(stop);
                    pheromone.deposit(prev, idx, deposit_amount);
                    prev = idx;
                }
                pheromone.deposit(prev, ProblemContext::DEPOT_INDEX, deposit_amount);
            }
        }

        ant_solutions.sort_by(|a, b| {
            fitness(b, &ctx.objectives, ctx.vehicles.len())
                .partial_cmp(&fitness(a, &ctx.objectives, ctx.vehicles.len()))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(iteration_best) = ant_solutions.into_iter().next() {
            let iteration_best_fitness = fitness(&iteration_best, &ctx.objectives, ctx.vehicles.len());
            if iteration_best_fitness > best_fitness {
                best_fitness = iteration_best_fitness;
                best = Some(iteration_best);
                debug!(iteration, best_fitness, "new best");
            }
        }
    }

    let solution = best.unwrap_or_else(|| {
        let mut fallback = crate::construct::construct(ctx);
        evaluate_solution(ctx, &mut fallback);
        fallback
    });

    info!(iterations, best_fitness, "aco finished");
    EngineResult {
        solution,
        iterations,
        cancelled,
    }
}
