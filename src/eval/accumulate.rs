use super::EvalResult;
use super::expression::{MappingShape, mapping_shape};
use crate::config::ComputeOptions;
use crate::errors::AggError;
use crate::registry::Registry;
use bson::{Bson, Document};

/// Reduces `collection` for one group field.
///
/// `field` is either an accumulator name, which is applied to `expr` directly, or an output
/// field name whose `expr` must be a mapping of accumulators (possibly nested).
///
/// # Errors
/// `InvalidGroupExpression` when an accumulator key shares its mapping with other keys, or
/// when `expr` is neither an accumulator application nor a mapping.
pub fn accumulate(
    registry: &Registry,
    collection: &[Bson],
    field: &str,
    expr: &Bson,
    options: Option<&ComputeOptions<'_>>,
) -> EvalResult {
    let fallback = ComputeOptions::default();
    let options = options.unwrap_or(&fallback);

    if let Some(acc) = registry.accumulator(field) {
        return acc(registry, collection, expr, options);
    }

    let Bson::Document(spec) = expr else {
        return Err(AggError::InvalidGroupExpression(format!(
            "{field} must be an accumulator or a mapping of accumulators, got {expr}"
        )));
    };

    match mapping_shape(spec, |k| registry.accumulator(k).is_some()) {
        MappingShape::Operator { name, arg } => {
            accumulate(registry, collection, name, arg, Some(options))
        }
        MappingShape::Mixed { name } => Err(AggError::InvalidGroupExpression(format!(
            "accumulator {name} must be the only key in {spec}"
        ))),
        MappingShape::Plain => {
            let mut out = Document::new();
            for (key, value) in spec {
                if let Some(v) = accumulate(registry, collection, key, value, Some(options))? {
                    out.insert(key.clone(), v);
                }
            }
            Ok(Some(Bson::Document(out)))
        }
    }
}
