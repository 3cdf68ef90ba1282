//! Stateless move operators shared by SA, Tabu, and the GA. Each takes
//! an RNG plus its target structure and returns a fresh copy; callers
//! re-evaluate metrics afterwards, since a move by itself knows nothing
//! about cost or feasibility.

pub mod permutation;
pub mod repair;
pub mod solution;

pub use permutation::{order_crossover, swap_mutation};
pub use repair::repair_capacity;
pub use solution::{relocate, swap, two_opt};
