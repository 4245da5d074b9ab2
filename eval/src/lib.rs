//! Vigil Eval
//!
//! Evaluate compiled constraint expressions against a value tree.
//!
//! Responsibilities:
//! - Resolve `this`, `block` and `root` paths from an explicit context
//! - Short-circuit boolean connectives and chained comparisons
//! - Propagate null through ordering comparisons and arithmetic
//! - Run the closed intrinsic function library
//! - Report unevaluable expressions as errors, never as `false`

mod context;
mod error;
mod eval;
mod intrinsics;

pub use context::EvalContext;
pub use error::{EvalError, EvalResult};
pub use eval::Evaluator;
