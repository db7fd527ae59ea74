#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contagion/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod centrality;
pub mod error;
pub mod groups;
pub mod indicators;
pub mod metrics;

pub use adjacency::AdjacencyMatrix;
pub use centrality::{CentralityConfig, Centralities};
pub use error::{NetworkError, Result};
pub use groups::GroupDelimiters;
pub use indicators::ConnectednessIndicators;
pub use metrics::{Measure, NetworkMetrics};
