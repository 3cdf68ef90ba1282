//! Error taxonomy for the solver.
//!
//! Only request validation and true internal invariant breaks abort a
//! solve. Infeasibility (unassigned locations) and route-level
//! violations are surfaced as data on a successful [`crate::solver::OptimizationResult`],
//! never as an `Err` — see `SPEC_FULL.md` §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal solver error: {0}")]
    Internal(String),
}
