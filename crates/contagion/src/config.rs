//! Run configuration
//!
//! Validated once per [`crate::compute`] call; nothing is cached between runs.

use crate::error::{EngineError, Result};
use contagion_causality::GrangerConfig;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed window lengths, from one trading month to one trading year
pub const BANDWIDTH_RANGE: RangeInclusive<usize> = 21..=252;

/// Largest accepted significance level
pub const MAX_SIGNIFICANCE: f64 = 0.1;

/// Largest accepted causality strength threshold
pub const MAX_STRENGTH_THRESHOLD: f64 = 0.2;

/// Largest accepted Granger lag order
pub const MAX_LAGS: usize = 10;

/// Connectedness run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectednessConfig {
    /// Rolling window length in observations (default: 252)
    pub bandwidth: usize,

    /// Significance level of the causality test (default: 0.05)
    pub significance: f64,

    /// Use HAC-robust p-values (default: false)
    pub robust: bool,

    /// Minimum standardized causality strength (default: 0.06)
    pub strength_threshold: f64,

    /// Granger lag order (default: 1)
    pub lags: usize,

    /// Whether the caller wants the result analyzed (default: false)
    pub analyze: bool,

    /// Worker threads (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for ConnectednessConfig {
    fn default() -> Self {
        Self {
            bandwidth: 252,
            significance: 0.05,
            robust: false,
            strength_threshold: 0.06,
            lags: 1,
            analyze: false,
            threads: None,
        }
    }
}

impl ConnectednessConfig {
    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<()> {
        if !BANDWIDTH_RANGE.contains(&self.bandwidth) {
            return Err(EngineError::InvalidConfig(format!(
                "bandwidth {} must be within [{}, {}]",
                self.bandwidth,
                BANDWIDTH_RANGE.start(),
                BANDWIDTH_RANGE.end()
            )));
        }

        if !(self.significance > 0.0 && self.significance <= MAX_SIGNIFICANCE) {
            return Err(EngineError::InvalidConfig(format!(
                "significance {} must be within (0, {}]",
                self.significance, MAX_SIGNIFICANCE
            )));
        }

        if !(self.strength_threshold > 0.0 && self.strength_threshold <= MAX_STRENGTH_THRESHOLD) {
            return Err(EngineError::InvalidConfig(format!(
                "strength threshold {} must be within (0, {}]",
                self.strength_threshold, MAX_STRENGTH_THRESHOLD
            )));
        }

        if !(1..=MAX_LAGS).contains(&self.lags) {
            return Err(EngineError::InvalidConfig(format!(
                "lags {} must be within [1, {}]",
                self.lags, MAX_LAGS
            )));
        }

        let granger = self.granger();
        if self.bandwidth < granger.min_observations() {
            return Err(EngineError::InvalidConfig(format!(
                "bandwidth {} is too short for {} lags (need {})",
                self.bandwidth,
                self.lags,
                granger.min_observations()
            )));
        }

        if self.threads == Some(0) {
            return Err(EngineError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Causality test settings derived from this configuration
    pub fn granger(&self) -> GrangerConfig {
        GrangerConfig {
            lags: self.lags,
            significance: self.significance,
            robust: self.robust,
            strength_threshold: self.strength_threshold,
            hac_lags: None,
        }
    }
}
