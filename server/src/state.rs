use std::path::PathBuf;

use ml_core::{ArtifactStore, Features, Predictor};
use serde::Serialize;
use tokio::task;

use crate::{error::ApiError, validation};

/// Shared handler state. Holds no model: the artifact pair is read from disk
/// on every request so a retrain is picked up without a restart.
#[derive(Debug, Clone)]
pub struct AppState {
    store: ArtifactStore,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

impl AppState {
    pub fn new(artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: ArtifactStore::new(artifacts_dir),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Loads the artifact pair on the blocking pool.
    ///
    /// # Errors
    /// `ApiError::Unavailable` if either artifact is missing or unreadable.
    pub async fn predictor(&self) -> Result<Predictor, ApiError> {
        let store = self.store.clone();
        let predictor = task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| ApiError::Internal(format!("artifact loader panicked: {e}")))??;
        Ok(predictor)
    }

    /// Loads the current artifacts, validates `features` and prices them.
    ///
    /// Availability is checked first: without a usable model every request is
    /// answered as unavailable, whatever its input.
    ///
    /// # Errors
    /// `ApiError::Unavailable`, then `ApiError::Validation`.
    pub async fn predict(&self, features: Features) -> Result<f64, ApiError> {
        let predictor = self.predictor().await?;
        validation::validate(&features)?;
        Ok(predictor.predict(&features)?)
    }

    /// Attempts to load each artifact independently. The service is only
    /// healthy if the two also pair into a working predictor.
    pub async fn health(&self) -> Health {
        let store = self.store.clone();
        let (model_loaded, scaler_loaded, usable) = task::spawn_blocking(move || {
            (
                store.load_model().is_ok(),
                store.load_scaler().is_ok(),
                store.load().is_ok(),
            )
        })
        .await
        .unwrap_or((false, false, false));

        let status = if usable {
            "healthy"
        } else {
            "unhealthy"
        };

        Health {
            status,
            model_loaded,
            scaler_loaded,
        }
    }
}
