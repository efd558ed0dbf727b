use crate::errors::AggError;
use bson::{Bson, Document};

/// Convert any JSON value into BSON. Integers become `Int64`, other numbers `Double`.
///
/// # Errors
/// Returns `AggError::Bson` when the value cannot be represented (e.g. u64 beyond i64).
pub fn json_value_to_bson(val: &serde_json::Value) -> Result<Bson, AggError> {
    bson::to_bson(val).map_err(|e| AggError::Bson(e.to_string()))
}

/// Parse JSON text into a BSON value, e.g. an expression.
///
/// # Errors
/// Returns an error on malformed JSON.
pub fn parse_json_to_bson(json: &str) -> Result<Bson, AggError> {
    let val: serde_json::Value = serde_json::from_str(json)?;
    json_value_to_bson(&val)
}

/// Parse JSON text that must be a top-level object into a document.
///
/// # Errors
/// Returns an error on malformed JSON or a non-object top level.
pub fn parse_json_to_document(json: &str) -> Result<Document, AggError> {
    match parse_json_to_bson(json)? {
        Bson::Document(d) => Ok(d),
        other => Err(AggError::Bson(format!(
            "expected JSON object, got {:?}",
            other.element_type()
        ))),
    }
}
