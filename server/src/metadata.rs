//! Static description of the deployed model.
//!
//! These numbers describe the reference training run and are served as-is;
//! they are not recomputed from the artifacts on disk.

use ml_core::{FEATURE_NAMES, NUM_FEATURES, TARGET_NAME};
use serde::Serialize;

pub const NAME: &str = "House Price Predictor";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ALGORITHM: &str = "LinearRegression";

pub const R2: f64 = 0.9783;
pub const RMSE: f64 = 11.60;
pub const MAE: f64 = 8.24;

pub const EQUATION: &str = "price = 242.65 + 54.08 × size + 10.91 × bedrooms + 2.73 × age";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Metrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// Short summary attached to every JSON prediction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelSummary {
    pub algorithm: &'static str,
    pub r2: f64,
    pub rmse: f64,
}

/// Body of `GET /api/info`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub algorithm: &'static str,
    pub features: [&'static str; NUM_FEATURES],
    pub target: &'static str,
    pub metrics: Metrics,
    pub equation: &'static str,
}

pub const METRICS: Metrics = Metrics {
    r2: R2,
    rmse: RMSE,
    mae: MAE,
};

pub fn summary() -> ModelSummary {
    ModelSummary {
        algorithm: ALGORITHM,
        r2: R2,
        rmse: RMSE,
    }
}

pub fn info() -> ModelInfo {
    ModelInfo {
        name: NAME,
        version: VERSION,
        algorithm: ALGORITHM,
        features: FEATURE_NAMES,
        target: TARGET_NAME,
        metrics: METRICS,
        equation: EQUATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_serializes_documented_fields() {
        let value = serde_json::to_value(info()).unwrap();

        assert_eq!(value["algorithm"], "LinearRegression");
        assert_eq!(value["features"], serde_json::json!(["size", "bedrooms", "age"]));
        assert_eq!(value["target"], "price");
        assert_eq!(value["metrics"]["r2"], 0.9783);
        assert_eq!(value["metrics"]["mae"], 8.24);
        assert!(value["equation"].as_str().unwrap().starts_with("price = 242.65"));
    }
}
