// ⚠️ Pipeline errors - one enum for every stage
//
// Each stage validates only its own input and returns these unchanged to the
// caller. Nothing in the library retries or recovers.

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raised for a non-positive row count or an invalid configuration value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Raised when a record lacks a field the stage depends on.
    #[error("transaction {transaction_id} is missing required field '{field}'")]
    MissingField {
        transaction_id: u64,
        field: &'static str,
    },

    /// Raised when a stage that must produce rows receives an empty table.
    #[error("stage '{stage}' received an empty table")]
    EmptyInput { stage: &'static str },

    /// Raised when an imported cell is outside its column's domain.
    #[error("invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Short machine-friendly name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidArgument(_) => "invalid_argument",
            PipelineError::MissingField { .. } => "missing_field",
            PipelineError::EmptyInput { .. } => "empty_input",
            PipelineError::InvalidValue { .. } => "invalid_value",
            PipelineError::Io(_) => "io",
            PipelineError::Csv(_) => "csv",
            PipelineError::Json(_) => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PipelineError::MissingField {
            transaction_id: 7,
            field: "transaction_date",
        };
        assert_eq!(
            err.to_string(),
            "transaction 7 is missing required field 'transaction_date'"
        );
        assert_eq!(err.kind(), "missing_field");

        let err = PipelineError::EmptyInput { stage: "aggregate" };
        assert_eq!(err.to_string(), "stage 'aggregate' received an empty table");
        assert_eq!(err.kind(), "empty_input");
    }
}
