use thiserror::Error;

/// Validation and contract errors exposed by `sentix-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid sentiment '{value}', expected one of bullish, bearish, neutral")]
    InvalidSentiment { value: String },

    #[error("endpoint '{field}' must be an absolute http(s) url: '{value}'")]
    InvalidEndpoint { field: &'static str, value: String },
    #[error("'{field}' must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for CoreError {
    fn from(error: figment::Error) -> Self {
        Self::Config(error.to_string())
    }
}
