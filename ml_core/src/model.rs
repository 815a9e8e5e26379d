use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::MlError;

/// Relative pivot threshold under which a direction of the normal equations
/// is treated as rank-deficient.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Ordinary least squares regression with an intercept.
///
/// The fit centers features and targets, solves the normal equations
/// `XᵀX·w = Xᵀy` on the centered data and recovers the intercept from the
/// means. Directions the data does not span (constant or collinear columns)
/// get a zero coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Builds a model from known parameters.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Fits the model on a `(samples, features)` matrix and its targets.
    ///
    /// # Errors
    /// - `MlError::ShapeMismatch` if `x` and `y` disagree on the sample count.
    /// - `MlError::NotEnoughSamples` if there are no samples.
    /// - `MlError::InvalidInput` if any value is not finite.
    pub fn fit(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Self, MlError> {
        let n = x.nrows();
        if y.len() != n {
            return Err(MlError::ShapeMismatch {
                what: "targets",
                got: y.len(),
                expected: n,
            });
        }
        if n == 0 {
            return Err(MlError::NotEnoughSamples { got: 0, needed: 1 });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(MlError::InvalidInput("regression input contains non-finite values"));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or(MlError::NotEnoughSamples { got: 0, needed: 1 })?;
        let y_mean = y.sum() / n as f64;

        let xc = &x - &x_mean;
        let yc = y.mapv(|v| v - y_mean);

        let gram = xc.t().dot(&xc);
        let moments = xc.t().dot(&yc);
        let coefficients = solve_normal_equations(gram, moments);
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self {
            coefficients: coefficients.to_vec(),
            intercept,
        })
    }

    /// Predicts one target per row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong number of columns.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        self.check_width(x.ncols())?;
        let w = ArrayView1::from(&self.coefficients);
        Ok(x.dot(&w) + self.intercept)
    }

    /// Predicts the target of a single sample: `w·x + b`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has the wrong length.
    pub fn predict_one(&self, x: ArrayView1<f64>) -> Result<f64, MlError> {
        self.check_width(x.len())?;
        let w = ArrayView1::from(&self.coefficients);
        Ok(w.dot(&x) + self.intercept)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }

    fn check_width(&self, got: usize) -> Result<(), MlError> {
        if got != self.coefficients.len() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got,
                expected: self.coefficients.len(),
            });
        }
        Ok(())
    }
}

/// Solves the square system `a·w = b` by Gauss-Jordan elimination with partial
/// pivoting.
///
/// Columns without a usable pivot are free variables and are left at zero,
/// which gives a least-squares solution when `a` is a singular Gram matrix.
fn solve_normal_equations(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let p = b.len();
    let largest = a.diag().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let tol = largest * PIVOT_TOLERANCE;

    let mut pivots = Vec::with_capacity(p);
    let mut row = 0;

    for col in 0..p {
        if row == p {
            break;
        }

        let (best, best_abs) = (row..p)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((row, -1.0), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if best_abs <= tol {
            continue;
        }

        if best != row {
            for c in 0..p {
                a.swap([row, c], [best, c]);
            }
            b.swap(row, best);
        }

        let pivot = a[[row, col]];
        for r in (0..p).filter(|&r| r != row) {
            let factor = a[[r, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..p {
                a[[r, c]] -= factor * a[[row, c]];
            }
            b[r] -= factor * b[row];
        }

        pivots.push((row, col));
        row += 1;
    }

    let mut w = Array1::zeros(p);
    for (r, c) in pivots {
        w[c] = b[r] / a[[r, c]];
    }
    w
}
