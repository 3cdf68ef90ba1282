pub mod evaluator;
pub mod fitness;

pub use evaluator::{evaluate_route, evaluate_solution, EvaluatedRoute};
pub use fitness::{cost, fitness};
