//! Operator registry and the registration protocol leaf-operator modules use.

mod category;
mod core;
mod operator;

pub use category::OperatorCategory;
pub use self::core::{Capabilities, Registry, is_valid_operator_name};
pub use operator::{
    AccumulatorFn, ExpressionFn, Operator, OperatorTable, PipelineFn, Predicate,
    ProjectionOperator, QueryOperator, RawOperator, RawProjectionFn, RawQueryFn,
};
