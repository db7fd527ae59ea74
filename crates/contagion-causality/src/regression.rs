//! Ordinary least squares through the normal equations
//!
//! The design matrices here are small (a constant plus a handful of lags), so
//! `β = (XᵀX)⁻¹ Xᵀy` is solved with a Cholesky factorization of `XᵀX`. A pivot
//! below a relative tolerance marks the regression as degenerate.

use crate::error::{CausalityError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Relative pivot tolerance for the Cholesky factorization
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Result of an OLS fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients (K)
    pub coefficients: Array1<f64>,
    /// Residuals (T)
    pub residuals: Array1<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// `(XᵀX)⁻¹` (K x K)
    pub xtx_inverse: Array2<f64>,
}

impl OlsFit {
    /// Residual degrees of freedom
    pub fn degrees_of_freedom(&self) -> usize {
        self.residuals.len().saturating_sub(self.coefficients.len())
    }
}

/// Lower-triangular Cholesky factor `L` with `L Lᵀ = matrix`
pub fn cholesky(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(CausalityError::InvalidParameter(format!(
            "cholesky needs a square matrix, got {}x{}",
            n,
            matrix.ncols()
        )));
    }

    let scale = matrix
        .diag()
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(f64::MIN_POSITIVE);

    let mut lower = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut pivot = matrix[[j, j]];
        for k in 0..j {
            pivot -= lower[[j, k]] * lower[[j, k]];
        }

        if !pivot.is_finite() || pivot <= PIVOT_TOLERANCE * scale {
            return Err(CausalityError::DegenerateInput(format!(
                "matrix is singular at pivot {}",
                j
            )));
        }

        let diag = pivot.sqrt();
        lower[[j, j]] = diag;

        for i in (j + 1)..n {
            let mut value = matrix[[i, j]];
            for k in 0..j {
                value -= lower[[i, k]] * lower[[j, k]];
            }
            lower[[i, j]] = value / diag;
        }
    }

    Ok(lower)
}

/// Solve `L Lᵀ x = b` given the Cholesky factor `L`
fn cholesky_solve(lower: &Array2<f64>, rhs: &Array1<f64>) -> Array1<f64> {
    let n = lower.nrows();

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut value = rhs[i];
        for k in 0..i {
            value -= lower[[i, k]] * z[k];
        }
        z[i] = value / lower[[i, i]];
    }

    // Back substitution: Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut value = z[i];
        for k in (i + 1)..n {
            value -= lower[[k, i]] * x[k];
        }
        x[i] = value / lower[[i, i]];
    }

    x
}

/// Inverse of a symmetric positive definite matrix
pub fn cholesky_inverse(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let lower = cholesky(matrix)?;
    let n = lower.nrows();

    let mut inverse = Array2::<f64>::zeros((n, n));
    for col in 0..n {
        let mut unit = Array1::<f64>::zeros(n);
        unit[col] = 1.0;
        inverse.column_mut(col).assign(&cholesky_solve(&lower, &unit));
    }

    Ok(inverse)
}

/// Regress `y` on the columns of `design`
///
/// # Arguments
/// * `design` - Regressors, one row per observation (T x K)
/// * `y` - Dependent variable (T)
pub fn fit_ols(design: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<OlsFit> {
    let (n_obs, n_regressors) = design.dim();
    if y.len() != n_obs {
        return Err(CausalityError::InvalidParameter(format!(
            "design has {} rows but y has {} observations",
            n_obs,
            y.len()
        )));
    }
    if n_obs <= n_regressors {
        return Err(CausalityError::InsufficientData {
            required: n_regressors + 1,
            actual: n_obs,
        });
    }

    let xtx = design.t().dot(&design);
    let xty = design.t().dot(&y);

    let lower = cholesky(&xtx)?;
    let coefficients = cholesky_solve(&lower, &xty);
    let xtx_inverse = cholesky_inverse(&xtx)?;

    let residuals = &y - &design.dot(&coefficients);
    let ssr = residuals.dot(&residuals);

    Ok(OlsFit {
        coefficients,
        residuals,
        ssr,
        xtx_inverse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_cholesky_reconstructs() {
        #[rustfmt::skip]
        let matrix = array![
            [4.0, 2.0, 0.4],
            [2.0, 5.0, 1.0],
            [0.4, 1.0, 3.0],
        ];
        let lower = cholesky(&matrix).unwrap();
        let rebuilt = lower.dot(&lower.t());
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rebuilt[[i, j]], matrix[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_singular() {
        let matrix = array![[1.0, 1.0], [1.0, 1.0]];
        assert!(matches!(
            cholesky(&matrix),
            Err(CausalityError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_inverse() {
        let matrix = array![[2.0, 1.0], [1.0, 3.0]];
        let inverse = cholesky_inverse(&matrix).unwrap();
        let identity = matrix.dot(&inverse);
        assert_relative_eq!(identity[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(identity[[0, 1]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(identity[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_line() {
        // y = 1 + 2x
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut design = Array2::<f64>::ones((5, 2));
        for (t, &value) in x.iter().enumerate() {
            design[[t, 1]] = value;
        }
        let y = Array1::from_iter(x.iter().map(|v| 1.0 + 2.0 * v));

        let fit = fit_ols(design.view(), y.view()).unwrap();
        assert_relative_eq!(fit.coefficients[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.ssr, 0.0, epsilon = 1e-18);
        assert_eq!(fit.degrees_of_freedom(), 3);
    }

    #[test]
    fn test_constant_regressor_is_degenerate() {
        // Constant column collinear with the intercept
        let design = Array2::<f64>::ones((6, 2));
        let y = array![0.1, 0.2, 0.0, -0.1, 0.3, 0.1];
        assert!(matches!(
            fit_ols(design.view(), y.view()),
            Err(CausalityError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_insufficient_rows() {
        let design = Array2::<f64>::ones((2, 2));
        let y = array![1.0, 2.0];
        assert!(matches!(
            fit_ols(design.view(), y.view()),
            Err(CausalityError::InsufficientData { .. })
        ));
    }
}
