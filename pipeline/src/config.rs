use std::path::PathBuf;

use crate::error::{PipelineError, Result};

pub const DEFAULT_DATA_PATH: &str = "./precios_casa.csv";
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";
pub const DEFAULT_TEST_SIZE: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Inputs of a training run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub artifacts_dir: PathBuf,
    /// Fraction of the cleaned rows held out for evaluation.
    pub test_size: f64,
    /// Seed of the shuffle behind the train/test split.
    pub seed: u64,
}

impl PipelineConfig {
    pub fn new(data_path: impl Into<PathBuf>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            artifacts_dir: artifacts_dir.into(),
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// # Errors
    /// Returns `PipelineError::InvalidConfig` if `test_size` is not strictly
    /// between 0 and 1.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH, DEFAULT_ARTIFACTS_DIR)
    }
}
