//! One-node classification of an expression.
//!
//! Evaluators classify each node once and then dispatch on the variant. A mapping that
//! names an operator is only ever seen as `Expr::Operator`, so the single-operator rule is
//! checked here and nowhere else.

use super::variables::{RedactVariable, SystemVariable};
use crate::errors::AggError;
use crate::registry::{OperatorCategory, Registry};
use bson::{Bson, Document};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'e> {
    /// Scalar returned as is.
    Literal(&'e Bson),
    /// `$$KEEP`, `$$PRUNE` or `$$DESCEND`, deferred to `redact`.
    Directive(RedactVariable),
    /// `$$ROOT`, `$$CURRENT` or `$$REMOVE`, optionally followed by `.path`.
    System { var: SystemVariable, path: Option<&'e str> },
    /// `$a.b` with the leading `$` stripped.
    FieldPath(&'e str),
    Sequence(&'e [Bson]),
    /// Mapping with no operator keys.
    Mapping(&'e Document),
    /// Single-entry mapping keyed by an expression or accumulator operator.
    Operator { name: &'e str, arg: &'e Bson },
}

/// Shape of a mapping with respect to a set of operator names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MappingShape<'e> {
    Plain,
    Operator { name: &'e str, arg: &'e Bson },
    /// An operator key sits next to other keys.
    Mixed { name: &'e str },
}

pub(crate) fn mapping_shape<'e, F>(map: &'e Document, is_operator: F) -> MappingShape<'e>
where
    F: Fn(&str) -> bool,
{
    let Some((name, arg)) = map.iter().find(|(k, _)| is_operator(k)) else {
        return MappingShape::Plain;
    };
    if map.len() == 1 {
        MappingShape::Operator { name: name.as_str(), arg }
    } else {
        MappingShape::Mixed { name: name.as_str() }
    }
}

/// True for names `compute_value` dispatches on inside a mapping.
pub(crate) fn is_value_operator(registry: &Registry, name: &str) -> bool {
    registry.contains(OperatorCategory::Expression, name)
        || registry.contains(OperatorCategory::Accumulator, name)
}

impl<'e> Expr<'e> {
    /// # Errors
    /// `InvalidExpression` when a mapping mixes an operator key with other keys.
    pub fn classify(expr: &'e Bson, registry: &Registry) -> Result<Self, AggError> {
        match expr {
            Bson::String(s) if s.starts_with('$') => Ok(Self::classify_path(s)),
            Bson::Array(items) => Ok(Self::Sequence(items)),
            Bson::Document(map) => match mapping_shape(map, |k| is_value_operator(registry, k)) {
                MappingShape::Plain => Ok(Self::Mapping(map)),
                MappingShape::Operator { name, arg } => Ok(Self::Operator { name, arg }),
                MappingShape::Mixed { name } => Err(AggError::InvalidExpression(format!(
                    "operator {name} must be the only key in {map}"
                ))),
            },
            other => Ok(Self::Literal(other)),
        }
    }

    fn classify_path(s: &'e str) -> Self {
        if let Some(directive) = RedactVariable::from_name(s) {
            return Self::Directive(directive);
        }
        let (head, rest) = match s.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (s, None),
        };
        match SystemVariable::from_name(head) {
            Some(var) => Self::System { var, path: rest },
            None => Self::FieldPath(&s[1..]),
        }
    }
}
