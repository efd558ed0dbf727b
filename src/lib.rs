//! Expression, accumulator and redaction evaluation for MongoDB-style aggregation.
//!
//! Operators are registered into a [`Registry`] in groups through
//! [`Registry::add_operators`]; the sealed registry is then passed by reference to
//! [`compute_value`], [`accumulate`] and [`redact`].
//!
//! ```
//! use bson::bson;
//! use nexus_agg::{OperatorCategory, RawOperator, Registry, compute_value};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_operators(OperatorCategory::Expression, |caps| {
//!         let compute = caps.compute_value;
//!         let double = RawOperator::expression(move |reg, doc, expr, opts| {
//!             let v = compute(reg, doc, expr, None, Some(opts))?;
//!             Ok(v.and_then(|v| v.as_i32()).map(|n| bson::Bson::Int32(n * 2)))
//!         });
//!         [("$double".to_string(), double)].into()
//!     })
//!     .unwrap();
//! let registry = registry.into_shared();
//!
//! let doc = bson!({"a": 5});
//! let out = compute_value(&registry, &doc, &bson!({"$double": "$a"}), None, None).unwrap();
//! assert_eq!(out, Some(bson::Bson::Int32(10)));
//! ```

pub mod config;
pub mod errors;
pub mod eval;
pub mod logger;
pub mod registry;
pub mod utils;

#[doc(hidden)]
pub use log as __log;

pub use config::{ComputeOptions, Config, Options};
pub use errors::AggError;
pub use eval::{
    EvalResult, RedactVariable, ResolveOptions, SystemVariable, accumulate, compute_value, redact,
    resolve,
};
pub use registry::{Capabilities, Operator, OperatorCategory, OperatorTable, RawOperator, Registry};

/// Initializes logging from `log4rs.yaml` in the working directory.
///
/// Optional; hosts with their own `log` backend should skip it.
///
/// # Errors
/// Returns an error if the logging config cannot be loaded.
pub fn init() -> Result<(), AggError> {
    logger::init()
}
