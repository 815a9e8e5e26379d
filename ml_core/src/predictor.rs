use ndarray::ArrayView2;

use crate::{Features, LinearRegression, MlError, NUM_FEATURES, StandardScaler};

/// A fitted `(scaler, model)` pair ready to price properties.
///
/// Inputs go through the stored scaler transform and then the linear model,
/// exactly as the training data did.
#[derive(Debug, Clone, PartialEq)]
pub struct Predictor {
    scaler: StandardScaler,
    model: LinearRegression,
}

impl Predictor {
    /// # Errors
    /// Returns `MlError::ShapeMismatch` unless both halves were fitted on
    /// exactly `NUM_FEATURES` features.
    pub fn new(scaler: StandardScaler, model: LinearRegression) -> Result<Self, MlError> {
        for (what, got) in [
            ("scaler features", scaler.num_features()),
            ("model features", model.num_features()),
        ] {
            if got != NUM_FEATURES {
                return Err(MlError::ShapeMismatch {
                    what,
                    got,
                    expected: NUM_FEATURES,
                });
            }
        }
        Ok(Self { scaler, model })
    }

    /// Estimated price, in thousands, for a single property.
    ///
    /// # Errors
    /// Never fails for a `Predictor` built through [`Predictor::new`]; the
    /// `Result` carries shape errors from the underlying transforms.
    pub fn predict(&self, features: &Features) -> Result<f64, MlError> {
        let scaled = self.scaler.transform_one(&features.to_array())?;
        self.model.predict_one(scaled.view())
    }

    /// Estimated prices for every row of an unscaled feature matrix.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `x` does not have `NUM_FEATURES`
    /// columns.
    pub fn predict_batch(&self, x: ArrayView2<f64>) -> Result<Vec<f64>, MlError> {
        let scaled = self.scaler.transform(x)?;
        Ok(self.model.predict(scaled.view())?.to_vec())
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }
}
