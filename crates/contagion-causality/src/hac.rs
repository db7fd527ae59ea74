//! Newey-West HAC (Heteroskedasticity and Autocorrelation Consistent) covariance
//!
//! Used by the robust causality test. The long-run covariance of the OLS
//! score vectors `g_t = x_t u_t` is estimated with Bartlett kernel weights and
//! plugged into the sandwich estimator of the coefficient covariance:
//!
//! ```text
//! Ω    = Γ_0 + Σ_{l=1}^{L} w_l * (Γ_l + Γ_lᵀ)
//! Γ_l  = (1/T) Σ_{t=l+1}^T g_t g_{t-l}ᵀ
//! w_l  = 1 - l/(L+1)                      (Bartlett kernel weights)
//! L    = ceil(4*(T/100)^(2/9))            (automatic lag selection)
//! V(β) = (XᵀX)⁻¹ (T Ω) (XᵀX)⁻¹
//! ```
//!
//! The scores have zero mean by the normal equations, so they are not demeaned.
//!
//! # References
//! - Newey, W. K., & West, K. D. (1987). "A Simple, Positive Semi-Definite,
//!   Heteroskedasticity and Autocorrelation Consistent Covariance Matrix."
//!   Econometrica, 55(3), 703-708.

use crate::error::{CausalityError, Result};
use crate::regression::OlsFit;
use ndarray::{Array2, ArrayView2, Axis, s};
use serde::{Deserialize, Serialize};

/// Newey-West estimator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeweyWestConfig {
    /// Number of lags for the HAC adjustment (None = automatic selection)
    pub lags: Option<usize>,
}

/// Newey-West HAC covariance estimator
#[derive(Debug, Clone, Default)]
pub struct NeweyWestEstimator {
    config: NeweyWestConfig,
}

impl NeweyWestEstimator {
    /// Create a new Newey-West estimator with the given configuration
    pub const fn new(config: NeweyWestConfig) -> Self {
        Self { config }
    }

    /// Lag length: the configured value, or `ceil(4 * (T/100)^(2/9))`
    pub fn optimal_lags(&self, n_periods: usize) -> usize {
        self.config.lags.unwrap_or_else(|| {
            let t = n_periods as f64;
            (4.0 * (t / 100.0).powf(2.0 / 9.0)).ceil() as usize
        })
    }

    /// Bartlett kernel weight `1 - l/(L+1)`, zero beyond `L`
    pub fn bartlett_weight(lag: usize, max_lag: usize) -> f64 {
        if lag == 0 {
            1.0
        } else if lag <= max_lag {
            1.0 - (lag as f64) / (max_lag as f64 + 1.0)
        } else {
            0.0
        }
    }

    /// Long-run covariance `Ω` of a zero-mean series (T x K)
    pub fn long_run_covariance(&self, scores: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        let n_periods = scores.nrows();
        if n_periods < 2 {
            return Err(CausalityError::InsufficientData {
                required: 2,
                actual: n_periods,
            });
        }

        let max_lag = self.optimal_lags(n_periods).min(n_periods - 1);

        let mut omega = scores.t().dot(&scores);
        for lag in 1..=max_lag {
            let weight = Self::bartlett_weight(lag, max_lag);
            let current = scores.slice(s![lag.., ..]);
            let lagged = scores.slice(s![..n_periods - lag, ..]);
            let gamma = current.t().dot(&lagged);

            omega.scaled_add(weight, &gamma);
            omega.scaled_add(weight, &gamma.t());
        }

        Ok(omega / n_periods as f64)
    }

    /// Sandwich covariance of the coefficients of `fit` estimated on `design`
    pub fn coefficient_covariance(
        &self,
        fit: &OlsFit,
        design: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>> {
        let n_periods = design.nrows();
        if fit.residuals.len() != n_periods {
            return Err(CausalityError::InvalidParameter(format!(
                "{} residuals for {} design rows",
                fit.residuals.len(),
                n_periods
            )));
        }

        let residuals = fit.residuals.view().insert_axis(Axis(1));
        let scores = &design * &residuals;
        let omega = self.long_run_covariance(scores.view())?;

        let meat = omega * n_periods as f64;
        Ok(fit.xtx_inverse.dot(&meat).dot(&fit.xtx_inverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::fit_ols;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    #[test]
    fn test_optimal_lags() {
        let estimator = NeweyWestEstimator::default();

        // ceil(4 * 1) = 4
        assert_eq!(estimator.optimal_lags(100), 4);
        // 2.51^(2/9) ≈ 1.227, ceil(4.91) = 5
        assert_eq!(estimator.optimal_lags(251), 5);
        // 5^(2/9) ≈ 1.430, ceil(5.72) = 6
        assert_eq!(estimator.optimal_lags(500), 6);
    }

    #[test]
    fn test_optimal_lags_manual() {
        let estimator = NeweyWestEstimator::new(NeweyWestConfig { lags: Some(10) });
        assert_eq!(estimator.optimal_lags(100), 10);
        assert_eq!(estimator.optimal_lags(500), 10);
    }

    #[test]
    fn test_bartlett_weight() {
        assert_relative_eq!(NeweyWestEstimator::bartlett_weight(0, 4), 1.0);
        assert_relative_eq!(NeweyWestEstimator::bartlett_weight(1, 4), 0.8);
        assert_relative_eq!(NeweyWestEstimator::bartlett_weight(4, 4), 0.2);
        assert_relative_eq!(NeweyWestEstimator::bartlett_weight(5, 4), 0.0);
    }

    #[test]
    fn test_zero_lags_is_outer_product_mean() {
        let estimator = NeweyWestEstimator::new(NeweyWestConfig { lags: Some(0) });

        #[rustfmt::skip]
        let scores = array![
            [1.0, -1.0],
            [-1.0, 2.0],
            [0.0, -1.0],
        ];
        let omega = estimator.long_run_covariance(scores.view()).unwrap();

        assert_relative_eq!(omega[[0, 0]], 2.0 / 3.0);
        assert_relative_eq!(omega[[0, 1]], -3.0 / 3.0);
        assert_relative_eq!(omega[[1, 1]], 6.0 / 3.0);
    }

    #[test]
    fn test_long_run_covariance_symmetric() {
        let estimator = NeweyWestEstimator::new(NeweyWestConfig { lags: Some(2) });
        let scores = Array2::from_shape_fn((40, 3), |(t, k)| ((t * 7 + k * 3) % 5) as f64 - 2.0);
        let omega = estimator.long_run_covariance(scores.view()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(omega[[i, j]], omega[[j, i]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_large_lag_clamping() {
        let estimator = NeweyWestEstimator::new(NeweyWestConfig { lags: Some(100) });
        let scores = Array2::<f64>::from_elem((10, 2), 0.01);
        assert!(estimator.long_run_covariance(scores.view()).is_ok());
    }

    #[test]
    fn test_coefficient_covariance_positive_diagonal() {
        let n = 80;
        let mut design = Array2::<f64>::ones((n, 2));
        let mut y = Array1::<f64>::zeros(n);
        for t in 0..n {
            let x = ((t * 13) % 11) as f64 / 11.0 - 0.5;
            design[[t, 1]] = x;
            y[t] = 0.3 * x + (((t * 7) % 5) as f64 - 2.0) * 0.01;
        }

        let fit = fit_ols(design.view(), y.view()).unwrap();
        let cov = NeweyWestEstimator::default()
            .coefficient_covariance(&fit, design.view())
            .unwrap();

        assert_eq!(cov.shape(), &[2, 2]);
        assert!(cov[[0, 0]] > 0.0);
        assert!(cov[[1, 1]] > 0.0);
        assert_relative_eq!(cov[[0, 1]], cov[[1, 0]], epsilon = 1e-12);
    }
}
