//! Expression evaluation: `compute_value`, `accumulate`, `redact` and the field-path
//! resolver they share.

mod accumulate;
mod compute;
mod expression;
mod redact;
mod resolve;
mod variables;

use crate::errors::AggError;
use bson::Bson;

/// Result of evaluating an expression. `Ok(None)` is the absent value.
pub type EvalResult = Result<Option<Bson>, AggError>;

pub use accumulate::accumulate;
pub use compute::compute_value;
pub use expression::Expr;
pub use redact::redact;
pub use resolve::{ResolveOptions, resolve};
pub use variables::{RedactVariable, SystemVariable};
