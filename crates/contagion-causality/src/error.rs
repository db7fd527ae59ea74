//! Error types for causality testing.

use thiserror::Error;

/// Result type for causality operations.
pub type Result<T> = std::result::Result<T, CausalityError>;

/// Errors that can occur while testing for causality
#[derive(Debug, Error)]
pub enum CausalityError {
    /// Too few observations for the requested lag order
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Constant series or singular regression; the builder treats it as no effect
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
