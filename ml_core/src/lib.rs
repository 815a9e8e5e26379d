mod artifacts;
mod data;
mod error;
mod model;
mod predictor;
mod scaler;
mod stats;

pub use artifacts::{ArtifactError, ArtifactStore, MODEL_FILE, SCALER_FILE};
pub use data::{FEATURE_NAMES, Features, NUM_FEATURES, Observation, TARGET_NAME, to_design};
pub use error::MlError;
pub use model::LinearRegression;
pub use predictor::Predictor;
pub use scaler::StandardScaler;
pub use stats::RegressionMetrics;
