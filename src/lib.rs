//! Multi-algorithm vehicle routing problem (VRP) solver.
//!
//! Given a depot, a set of customer locations with demands and time
//! windows, and a fleet of vehicles with capacity/cost/availability
//! constraints, [`solver::optimize`] returns an assignment of locations
//! to vehicle routes minimising a weighted blend of distance, time,
//! monetary cost, vehicle count, and workload imbalance.
//!
//! Five engines share the same route-construction and evaluation
//! machinery and differ only in how they sample the solution space:
//! Genetic Algorithm ([`engines::ga`]), Ant Colony Optimization
//! ([`engines::aco`]), Simulated Annealing ([`engines::sa`]), Tabu
//! Search ([`engines::tabu`]), and a GA-then-SA Hybrid
//! ([`engines::hybrid`]).

pub mod cancellation;
pub mod config;
pub mod construct;
pub mod domain;
pub mod engines;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod fixtures;
pub mod geometry;
pub mod moves;
pub mod solver;

pub use domain::request::{Constraints, Objectives, OptimizationRequest, Parameters};
pub use domain::solution::{Route, Solution};
pub use domain::types::{
    AlgorithmTag, Capacity, Coordinate, Demand, Depot, Location, RouteMetrics, Severity,
    TimeWindow, Vehicle, Violation, ViolationKind,
};
pub use error::SolveError;
pub use events::{EventSink, NullEventSink};
pub use solver::{optimize, CancellationToken, OptimizationResult, QualityMetrics, Summary};
