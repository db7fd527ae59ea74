//! Error types for network construction.

use thiserror::Error;

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors raised while building or validating a network.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Matrix dimensions do not agree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Self-causation found on the diagonal
    #[error("Non-zero diagonal entry at node {index}")]
    NonZeroDiagonal {
        /// Offending node
        index: usize,
    },

    /// Entry outside {0, 1}
    #[error("Non-binary entry at ({row}, {col})")]
    NonBinaryEntry {
        /// Row of the entry
        row: usize,
        /// Column of the entry
        col: usize,
    },

    /// Group delimiters do not partition the firms
    #[error("Invalid group delimiters: {0}")]
    InvalidGroups(String),
}
