use crate::registry::OperatorCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggError {
    #[error("Invalid operator name: {0}")]
    InvalidOperatorName(String),

    #[error("Operator already registered: {category} {name}")]
    DuplicateOperator { category: OperatorCategory, name: String },

    #[error("Operator {name} registered as {expected} but implemented as {found}")]
    CategoryMismatch { name: String, expected: OperatorCategory, found: OperatorCategory },

    #[error("Invalid aggregation expression: {0}")]
    InvalidExpression(String),

    #[error("Invalid $group expression: {0}")]
    InvalidGroupExpression(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<toml::de::Error> for AggError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
