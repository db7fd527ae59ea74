#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/contagion/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod builder;
pub mod error;
pub mod granger;
pub mod hac;
pub mod regression;

// Re-export main types
pub use builder::CausalGraphBuilder;
pub use error::{CausalityError, Result};
pub use granger::{GrangerConfig, GrangerOutcome, GrangerTest};
pub use hac::{NeweyWestConfig, NeweyWestEstimator};
pub use regression::{OlsFit, cholesky, cholesky_inverse, fit_ols};
