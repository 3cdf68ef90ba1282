//! The five search engines. Each shares [`crate::construct`],
//! [`crate::evaluation`], and [`crate::moves`] and differs only in how
//! it samples the solution space.

pub mod aco;
pub mod ga;
pub mod hybrid;
pub mod sa;
pub mod tabu;

use crate::domain::solution::Solution;

/// What every engine hands back to [`crate::solver::optimize`]: the best
/// solution it found, how many generations/iterations it actually ran
/// (which can be less than the requested maximum on early stop or
/// cancellation), and whether cancellation cut the run short.
#[derive(Debug, Clone)]
pub struct EngineResult {
    pub solution: Solution,
    pub iterations: usize,
    pub cancelled: bool,
}
