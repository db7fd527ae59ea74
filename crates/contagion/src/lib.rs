#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contagion/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod panel;
pub mod result;
pub mod scheduler;
pub mod window;

// Re-export main types from sub-crates
pub use contagion_causality as causality;
pub use contagion_network as network;

pub use aggregate::Aggregator;
pub use config::ConnectednessConfig;
pub use dataset::ConnectednessDataset;
pub use engine::{ConnectednessEngine, RunOutcome, compute};
pub use error::{EngineError, Result};
pub use monitor::{CancellationToken, NoopMonitor, ProgressMonitor, RunMonitor};
pub use panel::ReturnPanel;
pub use result::WindowResult;
pub use scheduler::{Schedule, WindowScheduler};
pub use window::{Window, Windows, windows};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
