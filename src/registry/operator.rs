//! Operator calling conventions: the raw shapes factories hand in, and the wrapped shapes
//! evaluators call.

use super::category::OperatorCategory;
use super::core::Registry;
use crate::config::{ComputeOptions, Config};
use crate::errors::AggError;
use crate::eval::{EvalResult, ResolveOptions, resolve};
use bson::Bson;
use std::collections::BTreeMap;
use std::sync::Arc;

/// `(registry, collection, expr, options)`. `expr` is `Null` when invoked from `compute_value`.
pub type AccumulatorFn =
    Arc<dyn Fn(&Registry, &[Bson], &Bson, &ComputeOptions<'_>) -> EvalResult + Send + Sync>;

/// `(registry, document, expr, options)`; `expr` arrives unevaluated.
pub type ExpressionFn =
    Arc<dyn Fn(&Registry, &Bson, &Bson, &ComputeOptions<'_>) -> EvalResult + Send + Sync>;

/// `(registry, collection, expr, options)` producing the stage output.
pub type PipelineFn = Arc<
    dyn Fn(&Registry, &[Bson], &Bson, &ComputeOptions<'_>) -> Result<Vec<Bson>, AggError>
        + Send
        + Sync,
>;

/// `(registry, selector, resolved, expr, options)`.
pub type RawProjectionFn = Arc<
    dyn Fn(&Registry, &str, Option<&Bson>, &Bson, &ComputeOptions<'_>) -> EvalResult + Send + Sync,
>;

/// `(registry, selector, resolved, compare, options)`.
pub type RawQueryFn = Arc<
    dyn Fn(&Registry, &str, Option<&Bson>, &Bson, &ComputeOptions<'_>) -> Result<bool, AggError>
        + Send
        + Sync,
>;

/// Document predicate produced by a wrapped query operator.
pub type Predicate<'r> = Box<dyn Fn(&Bson) -> Result<bool, AggError> + Send + Sync + 'r>;

/// Name -> raw implementation, as returned by a registration factory.
pub type OperatorTable = BTreeMap<String, RawOperator>;

/// An operator implementation as written by a leaf-operator module.
#[derive(Clone)]
pub enum RawOperator {
    Accumulator(AccumulatorFn),
    Expression(ExpressionFn),
    Pipeline(PipelineFn),
    Projection(RawProjectionFn),
    Query(RawQueryFn),
}

impl RawOperator {
    pub fn accumulator<F>(f: F) -> Self
    where
        F: Fn(&Registry, &[Bson], &Bson, &ComputeOptions<'_>) -> EvalResult + Send + Sync + 'static,
    {
        Self::Accumulator(Arc::new(f))
    }

    pub fn expression<F>(f: F) -> Self
    where
        F: Fn(&Registry, &Bson, &Bson, &ComputeOptions<'_>) -> EvalResult + Send + Sync + 'static,
    {
        Self::Expression(Arc::new(f))
    }

    pub fn pipeline<F>(f: F) -> Self
    where
        F: Fn(&Registry, &[Bson], &Bson, &ComputeOptions<'_>) -> Result<Vec<Bson>, AggError>
            + Send
            + Sync
            + 'static,
    {
        Self::Pipeline(Arc::new(f))
    }

    pub fn projection<F>(f: F) -> Self
    where
        F: Fn(&Registry, &str, Option<&Bson>, &Bson, &ComputeOptions<'_>) -> EvalResult
            + Send
            + Sync
            + 'static,
    {
        Self::Projection(Arc::new(f))
    }

    pub fn query<F>(f: F) -> Self
    where
        F: Fn(&Registry, &str, Option<&Bson>, &Bson, &ComputeOptions<'_>) -> Result<bool, AggError>
            + Send
            + Sync
            + 'static,
    {
        Self::Query(Arc::new(f))
    }

    #[must_use]
    pub const fn category(&self) -> OperatorCategory {
        match self {
            Self::Accumulator(_) => OperatorCategory::Accumulator,
            Self::Expression(_) => OperatorCategory::Expression,
            Self::Pipeline(_) => OperatorCategory::Pipeline,
            Self::Projection(_) => OperatorCategory::Projection,
            Self::Query(_) => OperatorCategory::Query,
        }
    }

    /// Applies the category calling convention.
    pub(crate) fn wrap(self) -> Operator {
        match self {
            Self::Accumulator(f) => Operator::Accumulator(f),
            Self::Expression(f) => Operator::Expression(f),
            Self::Pipeline(f) => Operator::Pipeline(f),
            Self::Projection(raw) => Operator::Projection(ProjectionOperator { raw }),
            Self::Query(raw) => Operator::Query(QueryOperator { raw }),
        }
    }
}

/// A registered operator, wrapped for its category.
#[derive(Clone)]
pub enum Operator {
    Accumulator(AccumulatorFn),
    Expression(ExpressionFn),
    Pipeline(PipelineFn),
    Projection(ProjectionOperator),
    Query(QueryOperator),
}

impl Operator {
    #[must_use]
    pub const fn category(&self) -> OperatorCategory {
        match self {
            Self::Accumulator(_) => OperatorCategory::Accumulator,
            Self::Expression(_) => OperatorCategory::Expression,
            Self::Pipeline(_) => OperatorCategory::Pipeline,
            Self::Projection(_) => OperatorCategory::Projection,
            Self::Query(_) => OperatorCategory::Query,
        }
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operator({})", self.category())
    }
}

/// Projection operator: resolves `document[selector]` (no array unwrapping) for the raw fn.
#[derive(Clone)]
pub struct ProjectionOperator {
    raw: RawProjectionFn,
}

impl ProjectionOperator {
    /// # Errors
    /// Propagates whatever the operator reports.
    pub fn project(
        &self,
        registry: &Registry,
        document: &Bson,
        expr: &Bson,
        selector: &str,
        options: &ComputeOptions<'_>,
    ) -> EvalResult {
        let resolved = resolve(document, selector, ResolveOptions::default());
        (self.raw)(registry, selector, resolved.as_ref(), expr, options)
    }
}

/// Query operator: curried into a document predicate. The predicate resolves
/// `document[selector]` with single-element arrays unwrapped, and hands the raw operator
/// the config and root binding of the options it was built with.
#[derive(Clone)]
pub struct QueryOperator {
    raw: RawQueryFn,
}

impl QueryOperator {
    #[must_use]
    pub fn predicate<'r>(
        &self,
        registry: &'r Registry,
        selector: &str,
        compare: &Bson,
        options: &ComputeOptions<'_>,
    ) -> Predicate<'r> {
        let raw = Arc::clone(&self.raw);
        let selector = selector.to_string();
        let compare = compare.clone();
        let config: Config = options.config.clone();
        let root: Option<Bson> = options.root.cloned();
        Box::new(move |document: &Bson| {
            let resolved = resolve(document, &selector, ResolveOptions { unwrap_array: true });
            let options = ComputeOptions { config: &config, root: root.as_ref() };
            raw(registry, &selector, resolved.as_ref(), &compare, &options)
        })
    }
}
