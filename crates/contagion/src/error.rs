//! Error types for connectedness runs.

use contagion_causality::CausalityError;
use contagion_network::NetworkError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a connectedness run.
///
/// Cancellation is not an error; see [`crate::engine::RunOutcome`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Window longer than the available observations
    #[error("Invalid window: bandwidth {bandwidth} exceeds {observations} observations")]
    InvalidWindow {
        /// Requested window length
        bandwidth: usize,
        /// Observations in the panel
        observations: usize,
    },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Return panel failed validation
    #[error("Invalid panel: {0}")]
    InvalidPanel(String),

    /// A window task failed; the whole run was abandoned
    #[error("Task for window {window} failed: {message}")]
    TaskFailure {
        /// Window index of the first failure
        window: usize,
        /// Error reported by the task
        message: String,
    },

    /// Aggregation invoked with unfilled window slots
    #[error("Incomplete results: {missing} of {expected} windows missing")]
    IncompleteResults {
        /// Number of empty slots
        missing: usize,
        /// Number of windows expected
        expected: usize,
    },

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Causality test error
    #[error("Causality error: {0}")]
    Causality(#[from] CausalityError),

    /// Network construction error
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}
