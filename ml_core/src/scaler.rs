use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::MlError;

/// Deviations below this are treated as a constant feature.
const ZERO_SCALE: f64 = 10.0 * f64::EPSILON;

/// Per-feature standardization: `(x - mean) / scale`.
///
/// `scale` is the population standard deviation of the training data, with
/// constant features given a scale of `1.0` so they map to zero instead of
/// dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    var: Vec<f64>,
    n_samples_seen: usize,
}

impl StandardScaler {
    /// Fits the scaler on a `(samples, features)` matrix.
    ///
    /// # Errors
    /// Returns `MlError::NotEnoughSamples` for an empty matrix and
    /// `MlError::InvalidInput` if any value is not finite.
    pub fn fit(x: ArrayView2<f64>) -> Result<Self, MlError> {
        let n = x.nrows();
        if n == 0 {
            return Err(MlError::NotEnoughSamples { got: 0, needed: 1 });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(MlError::InvalidInput("scaler input contains non-finite values"));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or(MlError::NotEnoughSamples { got: 0, needed: 1 })?;
        let var = x.var_axis(Axis(0), 0.0);
        let scale = var.mapv(|v| {
            let std = v.sqrt();
            if std < ZERO_SCALE { 1.0 } else { std }
        });

        Ok(Self {
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            var: var.to_vec(),
            n_samples_seen: n,
        })
    }

    /// Standardizes every row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` has a different number of
    /// columns than the data the scaler was fitted on.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, MlError> {
        self.check_width(x.ncols())?;
        let mean = ArrayView1::from(&self.mean);
        let scale = ArrayView1::from(&self.scale);
        Ok((&x - &mean) / &scale)
    }

    /// Standardizes a single sample.
    ///
    /// # Errors
    /// Same as [`StandardScaler::transform`].
    pub fn transform_one(&self, x: &[f64]) -> Result<Array1<f64>, MlError> {
        self.check_width(x.len())?;
        Ok(x
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect())
    }

    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn var(&self) -> &[f64] {
        &self.var
    }

    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }

    /// Checks that `mean`, `scale` and `var` describe the same features.
    ///
    /// A fitted scaler always passes; this guards scalers read back from disk.
    ///
    /// # Errors
    /// `MlError::ShapeMismatch` naming the vector whose length differs from
    /// `mean`.
    pub fn check_consistent(&self) -> Result<(), MlError> {
        for (what, got) in [("scale", self.scale.len()), ("var", self.var.len())] {
            if got != self.mean.len() {
                return Err(MlError::ShapeMismatch {
                    what,
                    got,
                    expected: self.mean.len(),
                });
            }
        }
        Ok(())
    }

    fn check_width(&self, got: usize) -> Result<(), MlError> {
        self.check_consistent()?;
        if got != self.mean.len() {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got,
                expected: self.mean.len(),
            });
        }
        Ok(())
    }
}
