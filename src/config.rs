//! Default tuning parameters for each engine.
//!
//! Mirrors the teacher's `config::constant` module in spirit (a single
//! place for magic numbers) but scoped to solver tuning — the teacher's
//! environment/CSV/seed constants belong to the out-of-scope data-source
//! layer, not the core engine.

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub mod ga {
    pub const POPULATION_SIZE: usize = 100;
    pub const GENERATIONS: usize = 500;
    pub const MUTATION_RATE: f64 = 0.02;
    pub const ELITE_SIZE: usize = 10;
    pub const TOURNAMENT_SIZE: usize = 5;
}

pub mod aco {
    pub const NUM_ANTS: usize = 50;
    pub const ITERATIONS: usize = 200;
    pub const ALPHA: f64 = 1.0;
    pub const BETA: f64 = 3.0;
    pub const EVAPORATION: f64 = 0.1;
    pub const DEPOSIT_FACTOR: f64 = 100.0;
    pub const INITIAL_PHEROMONE: f64 = 1.0;
    pub const VISIBILITY_OFFSET: f64 = 0.1;
}

pub mod sa {
    pub const INITIAL_TEMPERATURE: f64 = 10_000.0;
    pub const COOLING_RATE: f64 = 0.995;
    pub const MINIMUM_TEMPERATURE: f64 = 1.0;
}

pub mod tabu {
    pub const TENURE: usize = 20;
    pub const MAX_ITERATIONS: usize = 500;
    pub const NEIGHBOUR_SAMPLE: usize = 20;
}

pub mod hybrid {
    pub const GA_POPULATION_SIZE: usize = 50;
    pub const GA_GENERATIONS: usize = 200;
    pub const SA_INITIAL_TEMPERATURE: f64 = 1_000.0;
    pub const SA_COOLING_RATE: f64 = 0.99;
}

pub mod fitness {
    pub const DISTANCE_NUMERATOR: f64 = 10_000.0;
    pub const TIME_NUMERATOR: f64 = 1_000.0;
    pub const COST_NUMERATOR: f64 = 10_000.0;
    pub const VEHICLE_SCORE_FACTOR: f64 = 100.0;
    pub const BALANCE_SCORE_FACTOR: f64 = 100.0;
    pub const VIOLATION_PENALTY: f64 = 500.0;
}

pub mod quality {
    pub const CONVERGENCE_RATE: f64 = 85.0;
    pub const DIVERSITY_INDEX: f64 = 7.5;
    pub const HYBRID_DIVERSITY_INDEX: f64 = 8.5;
    pub const BALANCE_TARGET_UTILIZATION: f64 = 75.0;
}
