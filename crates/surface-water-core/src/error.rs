use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WaterQualityError {
    #[error("'{code}' is not a valid {context} factor code")]
    UnknownFactor { code: String, context: String },

    #[error("{factor} value {value} is out of range: {reason}")]
    OutOfRange {
        factor: String,
        value: Decimal,
        reason: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no measured value supplied for required factor '{code}'")]
    MissingReading { code: String },

    #[error("factor '{code}' was supplied more than once")]
    DuplicateReading { code: String },

    #[error("failed to load standard from {path}: {reason}")]
    StandardLoad { path: PathBuf, reason: String },

    #[error("invalid standard: {0}")]
    StandardInvalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
