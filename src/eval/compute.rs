use super::EvalResult;
use super::expression::Expr;
use super::resolve::{ResolveOptions, resolve};
use crate::config::ComputeOptions;
use crate::errors::AggError;
use crate::registry::Registry;
use bson::{Bson, Document};

/// Evaluates `expr` against `document`.
///
/// When `operator` names a registered expression operator, that operator receives `expr`
/// unevaluated. When it names an accumulator, `expr` is evaluated first and must yield an
/// array. Otherwise `expr` is interpreted by shape: `$`-strings are field paths or
/// variables, arrays and mappings are evaluated element-wise, scalars are returned as is.
///
/// `None` is the absent value (`$$REMOVE`, a missing field).
///
/// # Errors
/// `InvalidExpression` for a mapping that mixes an operator key with other keys,
/// `TypeError` for an accumulator argument that is not an array, and anything an operator
/// reports.
pub fn compute_value(
    registry: &Registry,
    document: &Bson,
    expr: &Bson,
    operator: Option<&str>,
    options: Option<&ComputeOptions<'_>>,
) -> EvalResult {
    let fallback = ComputeOptions::default();
    let options = options.unwrap_or(&fallback);

    if let Some(name) = operator {
        if let Some(op) = registry.expression(name) {
            return op(registry, document, expr, options);
        }
        if let Some(acc) = registry.accumulator(name) {
            let args = compute_value(registry, document, expr, None, Some(options))?;
            return match args {
                Some(Bson::Array(items)) => acc(registry, &items, &Bson::Null, options),
                other => Err(AggError::TypeError(format!(
                    "{name} expects an array argument, got {}",
                    describe(other.as_ref())
                ))),
            };
        }
    }

    match Expr::classify(expr, registry)? {
        Expr::Directive(directive) => Ok(Some(Bson::String(directive.name().to_string()))),
        Expr::System { var, path } => {
            let bound = options.with_root(document);
            let value = var.evaluate(document, &bound);
            Ok(match (value, path) {
                (None, _) => None,
                (Some(v), None) => Some(v.clone()),
                (Some(v), Some(rest)) => resolve(v, rest, ResolveOptions::default()),
            })
        }
        Expr::FieldPath(path) => Ok(resolve(document, path, ResolveOptions::default())),
        Expr::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let v = compute_value(registry, document, item, None, Some(options))?;
                out.push(v.unwrap_or(Bson::Null));
            }
            Ok(Some(Bson::Array(out)))
        }
        Expr::Mapping(map) => {
            let mut out = Document::new();
            for (key, value) in map {
                let operator = Some(key.as_str());
                let v = compute_value(registry, document, value, operator, Some(options))?;
                if let Some(v) = v {
                    out.insert(key.clone(), v);
                }
            }
            Ok(Some(Bson::Document(out)))
        }
        Expr::Operator { name, arg } => {
            compute_value(registry, document, arg, Some(name), Some(options))
        }
        Expr::Literal(v) => Ok(Some(v.clone())),
    }
}

pub(crate) fn describe(value: Option<&Bson>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| format!("{:?}", v.element_type()))
}
