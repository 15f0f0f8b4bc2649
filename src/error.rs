//! Error types for loan schedule calculations

use thiserror::Error;

/// Result type for loan calculations
pub type Result<T> = std::result::Result<T, LoanError>;

/// Errors surfaced to callers of the schedule builder, attributor and loaders
#[derive(Debug, Error)]
pub enum LoanError {
    /// Input that cannot be interpreted (malformed date, unknown tag, ...)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// The iteration ceiling was hit with balance still outstanding
    #[error("Schedule did not converge after {iterations} months (outstanding balance {outstanding:.2})")]
    ScheduleDidNotConverge { iterations: u32, outstanding: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoanError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
