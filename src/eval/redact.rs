use super::EvalResult;
use super::compute::compute_value;
use super::variables::RedactVariable;
use crate::config::ComputeOptions;
use crate::registry::Registry;
use bson::{Bson, Document};

const REDACT_TARGET: &str = "nexus_agg::redact";

/// Evaluates `expr` against `document` and applies the resulting directive.
///
/// Returns the (possibly rebuilt) document, `None` when it is pruned, or the computed value
/// itself when `expr` does not yield a directive. The input is never modified.
///
/// # Errors
/// Propagates evaluation errors from `compute_value`.
pub fn redact(
    registry: &Registry,
    document: &Bson,
    expr: &Bson,
    options: Option<&ComputeOptions<'_>>,
) -> EvalResult {
    let fallback = ComputeOptions::default();
    let options = options.unwrap_or(&fallback);

    let result = compute_value(registry, document, expr, None, Some(options))?;
    match result.as_ref().and_then(RedactVariable::from_value) {
        Some(directive) => {
            let bound = options.with_root(document);
            directive.apply(registry, document, expr, &bound)
        }
        None => Ok(result),
    }
}

impl RedactVariable {
    /// Runs the directive on `document`. `options` should already carry the root binding.
    ///
    /// # Errors
    /// Propagates errors from nested `redact` calls.
    pub fn apply(
        self,
        registry: &Registry,
        document: &Bson,
        expr: &Bson,
        options: &ComputeOptions<'_>,
    ) -> EvalResult {
        match self {
            Self::Keep => Ok(Some(document.clone())),
            Self::Prune => {
                log::trace!(target: REDACT_TARGET, "pruned subtree");
                Ok(None)
            }
            Self::Descend => descend(registry, document, expr, options),
        }
    }
}

fn has_cond(expr: &Bson) -> bool {
    matches!(expr, Bson::Document(d) if d.contains_key("$cond"))
}

fn is_nil(value: Option<&Bson>) -> bool {
    matches!(value, None | Some(Bson::Null))
}

/// Rebuilds `document`, redacting every embedded document and every document inside an
/// array. Only recurses when `expr` is a `$cond` mapping.
fn descend(
    registry: &Registry,
    document: &Bson,
    expr: &Bson,
    options: &ComputeOptions<'_>,
) -> EvalResult {
    let Bson::Document(fields) = document else {
        return Ok(Some(document.clone()));
    };
    if !has_cond(expr) {
        return Ok(Some(document.clone()));
    }

    let mut out = Document::new();
    for (key, value) in fields {
        let nested = match value {
            Bson::Document(_) => redact(registry, value, expr, Some(options))?,
            Bson::Array(items) => {
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    let item = match item {
                        Bson::Document(_) => redact(registry, item, expr, Some(options))?,
                        other => Some(other.clone()),
                    };
                    if !is_nil(item.as_ref()) {
                        kept.extend(item);
                    }
                }
                Some(Bson::Array(kept))
            }
            other => {
                out.insert(key.clone(), other.clone());
                continue;
            }
        };
        if is_nil(nested.as_ref()) {
            crate::eval_trace!("redact: removed field {}", key);
        } else if let Some(v) = nested {
            out.insert(key.clone(), v);
        }
    }
    Ok(Some(Bson::Document(out)))
}
