//! HTTP prediction service over a persisted `(scaler, model)` pair.
//!
//! Routes:
//! - `GET /` and `POST /`: HTML form.
//! - `POST /api/predict`: JSON prediction.
//! - `GET /api/health`: artifact availability.
//! - `GET /api/info`: static model description.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod page;
pub mod state;
pub mod validation;

use std::io;

use axum::{
    Router,
    routing::{get, post},
};
use log::{info, warn};
use tokio::{net::TcpListener, signal};

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit_form))
        .route("/api/predict", post(handlers::predict_api))
        .route("/api/health", get(handlers::health))
        .route("/api/info", get(handlers::info))
        .with_state(state)
}

/// Binds to the configured address and serves until Ctrl-C.
///
/// # Errors
/// Returns an io error if the address cannot be bound or the server fails.
pub async fn serve(config: ServerConfig) -> io::Result<()> {
    let state = AppState::new(&config.artifacts_dir);

    let health = state.health().await;
    if !health.model_loaded || !health.scaler_loaded {
        warn!(
            "artifacts not available in {}, predictions will fail until the pipeline is run",
            config.artifacts_dir.display()
        );
    }

    let listener = TcpListener::bind(config.addr()).await?;
    info!("listening on {}", listener.local_addr()?);

    run(listener, state).await
}

/// Serves `state` on an already bound listener until Ctrl-C.
///
/// # Errors
/// Returns an io error if the server fails.
pub async fn run(listener: TcpListener, state: AppState) -> io::Result<()> {
    let app = router(state);

    tokio::select! {
        res = axum::serve(listener, app).into_future() => res,
        _ = signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
            Ok(())
        }
    }
}
