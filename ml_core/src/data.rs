use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Number of predictors every model in this crate consumes.
pub const NUM_FEATURES: usize = 3;

/// Predictor column names, in the fixed order used by scalers and models.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = ["size", "bedrooms", "age"];

/// Target column name.
pub const TARGET_NAME: &str = "price";

/// The three predictors of a property.
///
/// `size` is in m², `bedrooms` is a count and `age` is in years. Values are
/// kept as `f64` because both the CSV input and the JSON API carry them as
/// plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub size: f64,
    pub bedrooms: f64,
    pub age: f64,
}

impl Features {
    pub const fn new(size: f64, bedrooms: f64, age: f64) -> Self {
        Self {
            size,
            bedrooms,
            age,
        }
    }

    /// Returns the predictors in `FEATURE_NAMES` order.
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [self.size, self.bedrooms, self.age]
    }
}

/// A single supervised sample: the predictors plus the observed price
/// (thousands of currency units).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub features: Features,
    pub price: f64,
}

impl Observation {
    pub fn new(size: f64, bedrooms: f64, age: f64, price: f64) -> Self {
        Self {
            features: Features::new(size, bedrooms, age),
            price,
        }
    }

    /// Bit pattern of every field, used for exact duplicate detection.
    pub fn key(&self) -> [u64; NUM_FEATURES + 1] {
        let [s, b, a] = self.features.to_array();
        [s.to_bits(), b.to_bits(), a.to_bits(), self.price.to_bits()]
    }
}

/// Splits a set of observations into a row-major feature matrix and a target
/// vector.
pub fn to_design(observations: &[Observation]) -> (Array2<f64>, Array1<f64>) {
    let x = Array2::from_shape_fn((observations.len(), NUM_FEATURES), |(row, col)| {
        observations[row].features.to_array()[col]
    });
    let y = observations.iter().map(|o| o.price).collect();
    (x, y)
}
