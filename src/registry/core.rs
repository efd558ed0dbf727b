use super::category::OperatorCategory;
use super::operator::{
    AccumulatorFn, ExpressionFn, Operator, OperatorTable, PipelineFn, ProjectionOperator,
    QueryOperator,
};
use crate::config::ComputeOptions;
use crate::errors::AggError;
use crate::eval::{self, EvalResult, ResolveOptions};
use bson::Bson;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static OPERATOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$[a-zA-Z0-9_]*$").expect("operator name pattern"));

/// Returns true if `name` is acceptable as an operator name (`$` followed by word chars).
#[must_use]
pub fn is_valid_operator_name(name: &str) -> bool {
    OPERATOR_NAME.is_match(name)
}

/// Evaluator entry points handed to registration factories, so leaf operators can recurse
/// into sub-expressions.
#[derive(Clone, Copy)]
pub struct Capabilities {
    pub accumulate: fn(&Registry, &[Bson], &str, &Bson, Option<&ComputeOptions<'_>>) -> EvalResult,
    pub compute_value:
        fn(&Registry, &Bson, &Bson, Option<&str>, Option<&ComputeOptions<'_>>) -> EvalResult,
    pub resolve: fn(&Bson, &str, ResolveOptions) -> Option<Bson>,
}

impl Capabilities {
    pub const BUILTIN: Self = Self {
        accumulate: eval::accumulate,
        compute_value: eval::compute_value,
        resolve: eval::resolve,
    };
}

/// Operator table keyed by category then name.
///
/// Populate with `add_operators`, then seal with `into_shared` before handing it to
/// evaluators. There is no removal.
#[derive(Debug)]
pub struct Registry {
    tables: HashMap<OperatorCategory, HashMap<String, Operator>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        let tables = OperatorCategory::ALL.into_iter().map(|c| (c, HashMap::new())).collect();
        Self { tables }
    }

    #[must_use]
    pub fn get_operator(&self, category: OperatorCategory, name: &str) -> Option<&Operator> {
        self.tables.get(&category).and_then(|t| t.get(name))
    }

    #[must_use]
    pub fn contains(&self, category: OperatorCategory, name: &str) -> bool {
        self.get_operator(category, name).is_some()
    }

    #[must_use]
    pub fn expression(&self, name: &str) -> Option<&ExpressionFn> {
        match self.get_operator(OperatorCategory::Expression, name) {
            Some(Operator::Expression(f)) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn accumulator(&self, name: &str) -> Option<&AccumulatorFn> {
        match self.get_operator(OperatorCategory::Accumulator, name) {
            Some(Operator::Accumulator(f)) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn pipeline(&self, name: &str) -> Option<&PipelineFn> {
        match self.get_operator(OperatorCategory::Pipeline, name) {
            Some(Operator::Pipeline(f)) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn projection(&self, name: &str) -> Option<&ProjectionOperator> {
        match self.get_operator(OperatorCategory::Projection, name) {
            Some(Operator::Projection(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn query(&self, name: &str) -> Option<&QueryOperator> {
        match self.get_operator(OperatorCategory::Query, name) {
            Some(Operator::Query(q)) => Some(q),
            _ => None,
        }
    }

    /// Names registered under `category`, sorted.
    #[must_use]
    pub fn names(&self, category: OperatorCategory) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .tables
            .get(&category)
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Merges already-wrapped operators into `category`, overwriting existing names.
    ///
    /// # Errors
    /// Returns `CategoryMismatch` if an operator belongs to a different category; nothing is
    /// inserted in that case.
    pub fn use_operators<I>(
        &mut self,
        category: OperatorCategory,
        operators: I,
    ) -> Result<(), AggError>
    where
        I: IntoIterator<Item = (String, Operator)>,
    {
        let operators: Vec<(String, Operator)> = operators.into_iter().collect();
        if let Some((name, op)) = operators.iter().find(|(_, op)| op.category() != category) {
            return Err(AggError::CategoryMismatch {
                name: name.clone(),
                expected: category,
                found: op.category(),
            });
        }
        self.tables.entry(category).or_default().extend(operators);
        Ok(())
    }

    /// Registers a group of operators produced by `factory`.
    ///
    /// Every name is checked before anything is inserted, so a failed call leaves the
    /// registry as it was.
    ///
    /// # Errors
    /// `InvalidOperatorName`, `DuplicateOperator` or `CategoryMismatch`.
    pub fn add_operators<F>(
        &mut self,
        category: OperatorCategory,
        factory: F,
    ) -> Result<(), AggError>
    where
        F: FnOnce(&Capabilities) -> OperatorTable,
    {
        let table = factory(&Capabilities::BUILTIN);
        for (name, raw) in &table {
            if !is_valid_operator_name(name) {
                log::warn!("rejected {category} operator with invalid name {name:?}");
                return Err(AggError::InvalidOperatorName(name.clone()));
            }
            if self.contains(category, name) {
                log::warn!("rejected duplicate {category} operator {name}");
                return Err(AggError::DuplicateOperator { category, name: name.clone() });
            }
            if raw.category() != category {
                return Err(AggError::CategoryMismatch {
                    name: name.clone(),
                    expected: category,
                    found: raw.category(),
                });
            }
        }
        let count = table.len();
        self.use_operators(category, table.into_iter().map(|(name, raw)| (name, raw.wrap())))?;
        log::debug!("registered {count} {category} operator(s)");
        crate::eval_trace!("registry: +{} {}", count, category);
        Ok(())
    }

    /// Ends the registration phase.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
