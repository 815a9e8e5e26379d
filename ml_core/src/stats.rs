use ndarray::ArrayView1;
use serde::Serialize;

use crate::MlError;

/// Goodness-of-fit figures for a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    r2: f64,
    rmse: f64,
    mae: f64,
}

impl RegressionMetrics {
    /// Computes R², RMSE and MAE of `y_pred` against `y_true`.
    ///
    /// R² follows the usual conventions for degenerate inputs: it is `NaN`
    /// with fewer than two samples, and with a constant `y_true` it is `1.0`
    /// for a perfect prediction and `0.0` otherwise.
    ///
    /// # Args
    /// * `y_true` - Observed targets.
    /// * `y_pred` - Predicted targets, same length as `y_true`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if the lengths differ and
    /// `MlError::NotEnoughSamples` if both are empty.
    pub fn compute(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<Self, MlError> {
        let n = y_true.len();
        if y_pred.len() != n {
            return Err(MlError::ShapeMismatch {
                what: "predictions",
                got: y_pred.len(),
                expected: n,
            });
        }
        if n == 0 {
            return Err(MlError::NotEnoughSamples { got: 0, needed: 1 });
        }

        let residuals = &y_true - &y_pred;
        let ss_res = residuals.mapv(|r| r * r).sum();
        let mae = residuals.mapv(f64::abs).sum() / n as f64;
        let rmse = (ss_res / n as f64).sqrt();

        let r2 = if n < 2 {
            f64::NAN
        } else {
            let mean = y_true.sum() / n as f64;
            let ss_tot = y_true.mapv(|y| (y - mean).powi(2)).sum();
            match (ss_tot == 0.0, ss_res == 0.0) {
                (true, true) => 1.0,
                (true, false) => 0.0,
                (false, _) => 1.0 - ss_res / ss_tot,
            }
        };

        Ok(Self { r2, rmse, mae })
    }

    /// Coefficient of determination.
    pub fn r2(&self) -> f64 {
        self.r2
    }

    /// Root mean squared error, in target units.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Mean absolute error, in target units.
    pub fn mae(&self) -> f64 {
        self.mae
    }
}
