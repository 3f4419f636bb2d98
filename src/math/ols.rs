//! Ordinary least squares for a straight line, with coefficient uncertainty.
//!
//! The trend estimator solves a single small regression:
//!
//! ```text
//! minimize Σ (y_i - (slope·x_i + intercept))^2
//! ```
//!
//! Implementation choices:
//! - We build the `n×2` design matrix `[x, 1]` and solve via SVD, which stays
//!   robust when the design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - The coefficient covariance is `σ² (XᵀX)⁻¹` with `σ² = SSE / (n - 2)`.
//!   With zero residual degrees of freedom (n = 2, exact interpolation) the
//!   residuals carry no information and the uncertainties are reported as 0.

use nalgebra::{DMatrix, DVector};

use crate::error::ClimError;

/// A fitted line `y = coeffs[0]·x + coeffs[1]` with marginal standard errors.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    /// `[slope, intercept]`.
    pub coeffs: [f64; 2],
    /// `sqrt(diag(covariance))` for `coeffs`.
    pub std_errs: [f64; 2],
    /// Sum of squared residuals.
    pub sse: f64,
}

impl LineFit {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.coeffs[0] * x + self.coeffs[1]
    }
}

/// Fit a first-degree polynomial to `(x, y)` by ordinary least squares.
///
/// Requires at least 2 points with distinct `x`; the caller is responsible
/// for checking that precondition and reporting it as its own error.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, ClimError> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();

    let mut design = DMatrix::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = xi;
        design[(i, 1)] = 1.0;
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or_else(|| {
        ClimError::Numeric("Trend regression is too ill-conditioned to solve.".to_string())
    })?;

    let residuals = &rhs - &design * &beta;
    let sse = residuals.norm_squared();

    // Covariance of the coefficients: σ² (XᵀX)⁻¹.
    let xtx = design.transpose() * &design;
    let xtx_inv = xtx.try_inverse().ok_or_else(|| {
        ClimError::Numeric("Normal matrix of the trend regression is singular.".to_string())
    })?;

    let dof = n.saturating_sub(2);
    let sigma2 = if dof > 0 { sse / dof as f64 } else { 0.0 };

    let std_errs = [
        (sigma2 * xtx_inv[(0, 0)]).max(0.0).sqrt(),
        (sigma2 * xtx_inv[(1, 1)]).max(0.0).sqrt(),
    ];

    let fit = LineFit {
        coeffs: [beta[0], beta[1]],
        std_errs,
        sse,
    };

    if !fit.coeffs.iter().chain(fit.std_errs.iter()).all(|v| v.is_finite()) {
        return Err(ClimError::Numeric(
            "Trend regression produced non-finite coefficients.".to_string(),
        ));
    }

    Ok(fit)
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
