//! Pairwise Granger causality
//!
//! Tests whether the lags of a cause series improve the autoregressive fit of
//! an effect series:
//!
//! ```text
//! restricted:   y_t = c + Σ_{l=1}^{p} a_l y_{t-l}                        + e_t
//! unrestricted: y_t = c + Σ_{l=1}^{p} a_l y_{t-l} + Σ_{l=1}^{p} b_l x_{t-l} + u_t
//! H0: b_1 = ... = b_p = 0
//! ```
//!
//! The ordinary test uses `F = ((SSR_r - SSR_u)/p) / (SSR_u/(n - 2p - 1))`
//! against `F(p, n - 2p - 1)`. The robust test uses the Wald statistic
//! `W = bᵀ V_b⁻¹ b` with a Newey-West HAC covariance against `χ²(p)`.
//!
//! Both series are demeaned and scaled to unit variance before fitting, so the
//! cross coefficients are already standardized (`b_l * sd(x) / sd(y)` on the
//! raw data) and the strength of the effect is their Euclidean norm. The
//! statistics do not depend on the units of the returns.
//!
//! # References
//! - Granger, C. W. J. (1969). "Investigating Causal Relations by Econometric
//!   Models and Cross-spectral Methods." Econometrica, 37(3), 424-438.

use crate::error::{CausalityError, Result};
use crate::hac::{NeweyWestConfig, NeweyWestEstimator};
use crate::regression::{OlsFit, cholesky_inverse, fit_ols};
use ndarray::{Array1, Array2, ArrayView1, s};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

/// Standard deviation relative to the series magnitude below which it is constant
const RELATIVE_SPREAD_TOLERANCE: f64 = 1e-10;

/// Residual variance of a standardized regression treated as an exact fit
const EXACT_FIT_TOLERANCE: f64 = 1e-24;

/// Granger test configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrangerConfig {
    /// Lag order p (default: 1)
    pub lags: usize,

    /// Significance level; edges need `p < significance` (default: 0.05)
    pub significance: f64,

    /// Use HAC-robust Wald p-values instead of the F-test (default: false)
    pub robust: bool,

    /// Minimum standardized causality strength (default: 0.06)
    pub strength_threshold: f64,

    /// Newey-West lags for the robust test (None = automatic selection)
    pub hac_lags: Option<usize>,
}

impl Default for GrangerConfig {
    fn default() -> Self {
        Self {
            lags: 1,
            significance: 0.05,
            robust: false,
            strength_threshold: 0.06,
            hac_lags: None,
        }
    }
}

impl GrangerConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.lags == 0 {
            return Err(CausalityError::InvalidParameter(
                "lags must be at least 1".to_string(),
            ));
        }
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(CausalityError::InvalidParameter(format!(
                "significance {} must be in (0, 1)",
                self.significance
            )));
        }
        if !(self.strength_threshold >= 0.0 && self.strength_threshold.is_finite()) {
            return Err(CausalityError::InvalidParameter(format!(
                "strength threshold {} must be non-negative",
                self.strength_threshold
            )));
        }
        Ok(())
    }

    /// Observations needed for one test: `p` lags plus `2p + 2` usable rows
    pub const fn min_observations(&self) -> usize {
        3 * self.lags + 2
    }
}

/// Outcome of one directed test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrangerOutcome {
    /// F or Wald statistic
    pub statistic: f64,
    /// p-value of the exclusion test
    pub p_value: f64,
    /// Standardized strength of the cross coefficients
    pub strength: f64,
}

impl GrangerOutcome {
    /// Whether the outcome passes both the significance and strength filters
    pub fn is_causal(&self, config: &GrangerConfig) -> bool {
        self.p_value < config.significance && self.strength >= config.strength_threshold
    }
}

/// Granger causality test runner
#[derive(Debug, Clone, Default)]
pub struct GrangerTest {
    config: GrangerConfig,
    hac: NeweyWestEstimator,
}

impl GrangerTest {
    /// Create a new test with the given configuration
    pub fn new(config: GrangerConfig) -> Self {
        let hac = NeweyWestEstimator::new(NeweyWestConfig {
            lags: config.hac_lags,
        });
        Self { config, hac }
    }

    /// Configuration in use
    pub const fn config(&self) -> &GrangerConfig {
        &self.config
    }

    /// Test whether `cause` Granger-causes `effect`
    ///
    /// Returns [`CausalityError::DegenerateInput`] when either series is
    /// constant or a regression is singular.
    pub fn test(
        &self,
        cause: ArrayView1<'_, f64>,
        effect: ArrayView1<'_, f64>,
    ) -> Result<GrangerOutcome> {
        let n_periods = effect.len();
        if cause.len() != n_periods {
            return Err(CausalityError::InvalidParameter(format!(
                "cause has {} observations, effect has {}",
                cause.len(),
                n_periods
            )));
        }

        let required = self.config.min_observations();
        if n_periods < required {
            return Err(CausalityError::InsufficientData {
                required,
                actual: n_periods,
            });
        }

        let cause = standardize(cause)?;
        let effect = standardize(effect)?;

        let p = self.config.lags;
        let y = effect.slice(s![p..]);
        let unrestricted_design = lagged_design(effect.view(), Some(cause.view()), p);
        let restricted_design = lagged_design(effect.view(), None, p);

        let unrestricted = fit_ols(unrestricted_design.view(), y)?;
        let cross = unrestricted.coefficients.slice(s![1 + p..]).to_owned();
        let strength = cross.dot(&cross).sqrt();

        let (statistic, p_value) = if self.config.robust {
            self.wald_test(&unrestricted, &unrestricted_design)?
        } else {
            let restricted = fit_ols(restricted_design.view(), y)?;
            Self::f_test(&restricted, &unrestricted, p)?
        };

        Ok(GrangerOutcome {
            statistic,
            p_value,
            strength,
        })
    }

    fn f_test(restricted: &OlsFit, unrestricted: &OlsFit, p: usize) -> Result<(f64, f64)> {
        let df_den = unrestricted.degrees_of_freedom();
        let scale = unrestricted.ssr / df_den as f64;
        if !(scale > EXACT_FIT_TOLERANCE) {
            // Exact fit: only causal if the cause lags removed all the error
            return if restricted.ssr / df_den as f64 > EXACT_FIT_TOLERANCE {
                Ok((f64::INFINITY, 0.0))
            } else {
                Err(CausalityError::DegenerateInput(
                    "restricted model fits exactly".to_string(),
                ))
            };
        }

        let statistic = ((restricted.ssr - unrestricted.ssr) / p as f64 / scale).max(0.0);
        let distribution = FisherSnedecor::new(p as f64, df_den as f64)
            .map_err(|e| CausalityError::InvalidParameter(e.to_string()))?;

        Ok((statistic, distribution.sf(statistic)))
    }

    fn wald_test(&self, unrestricted: &OlsFit, design: &Array2<f64>) -> Result<(f64, f64)> {
        let p = self.config.lags;
        let covariance = self.hac.coefficient_covariance(unrestricted, design.view())?;

        let cross_cov = covariance.slice(s![1 + p.., 1 + p..]).to_owned();
        let cross = unrestricted.coefficients.slice(s![1 + p..]);

        let precision = cholesky_inverse(&cross_cov)?;
        let statistic = cross.dot(&precision.dot(&cross)).max(0.0);
        let distribution = ChiSquared::new(p as f64)
            .map_err(|e| CausalityError::InvalidParameter(e.to_string()))?;

        Ok((statistic, distribution.sf(statistic)))
    }
}

/// Demean and scale to unit sample variance, rejecting constant or
/// non-finite series
fn standardize(series: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    let n = series.len() as f64;
    let mean = series.sum() / n;
    let variance = series.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let sd = variance.sqrt();
    let magnitude = series.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    let finite = sd.is_finite() && magnitude.is_finite();
    if !finite || sd <= RELATIVE_SPREAD_TOLERANCE * magnitude {
        return Err(CausalityError::DegenerateInput(
            "series has zero variance".to_string(),
        ));
    }

    Ok(series.mapv(|v| (v - mean) / sd))
}

/// Design `[1, y_{t-1..t-p}, x_{t-1..t-p}]` for `t = p..T`
fn lagged_design(
    own: ArrayView1<'_, f64>,
    other: Option<ArrayView1<'_, f64>>,
    lags: usize,
) -> Array2<f64> {
    let n_rows = own.len() - lags;
    let n_cols = 1 + lags * if other.is_some() { 2 } else { 1 };
    let mut design = Array2::<f64>::ones((n_rows, n_cols));

    for lag in 1..=lags {
        design
            .column_mut(lag)
            .assign(&own.slice(s![lags - lag..own.len() - lag]));
        if let Some(other) = other {
            design
                .column_mut(lags + lag)
                .assign(&other.slice(s![lags - lag..other.len() - lag]));
        }
    }

    design
}
