use axum::{
    Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use log::{info, warn};
use ml_core::Features;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    metadata::{self, ModelInfo, ModelSummary},
    page::{self, FormValues, Outcome},
    state::{AppState, Health},
};

/// Raw form fields; parsed by hand so a bad value re-renders the page.
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub bedrooms: String,
    #[serde(default)]
    pub age: String,
}

/// Inputs as they were priced: counts are whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedFeatures {
    pub size: f64,
    pub bedrooms: i64,
    pub age: i64,
}

impl From<Features> for PricedFeatures {
    fn from(f: Features) -> Self {
        Self {
            size: f.size,
            bedrooms: f.bedrooms as i64,
            age: f.age as i64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
    pub features: PricedFeatures,
    pub model_info: ModelSummary,
}

/// Bedrooms and age are counts; fractional JSON values are truncated toward
/// zero before validation.
fn whole_counts(f: Features) -> Features {
    Features::new(f.size, f.bedrooms.trunc(), f.age.trunc())
}

impl PredictForm {
    fn values(&self) -> FormValues {
        FormValues {
            size: self.size.clone(),
            bedrooms: self.bedrooms.clone(),
            age: self.age.clone(),
        }
    }

    fn features(&self) -> Result<Features, String> {
        let size = self
            .size
            .trim()
            .parse::<f64>()
            .map_err(|_| "size must be a number".to_string())?;
        let count = |name: &str, raw: &str| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| format!("{name} must be a whole number"))
        };
        Ok(Features::new(
            size,
            count("bedrooms", &self.bedrooms)? as f64,
            count("age", &self.age)? as f64,
        ))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn index() -> Html<String> {
    Html(page::render(&FormValues::default(), &Outcome::Empty))
}

pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let err = ApiError::from(rejection);
            warn!("form rejected: {err}");
            let html = page::render(&FormValues::default(), &Outcome::Error(err.to_string()));
            return (err.status(), Html(html)).into_response();
        }
    };

    let values = form.values();
    let features = match form.features() {
        Ok(features) => features,
        Err(message) => {
            warn!("form rejected: {message}");
            let html = page::render(&values, &Outcome::Error(message));
            return (StatusCode::BAD_REQUEST, Html(html)).into_response();
        }
    };

    match state.predict(features).await {
        Ok(price) => {
            info!(size = features.size, bedrooms = features.bedrooms, age = features.age, price = price; "form prediction");
            Html(page::render(&values, &Outcome::Prediction { features, price })).into_response()
        }
        Err(err) => {
            warn!("form prediction failed: {err}");
            let html = page::render(&values, &Outcome::Error(err.to_string()));
            (err.status(), Html(html)).into_response()
        }
    }
}

pub async fn predict_api(
    State(state): State<AppState>,
    payload: Result<Json<Features>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(features) = payload.inspect_err(|e| warn!("json rejected: {e}"))?;
    let features = whole_counts(features);

    let price = state
        .predict(features)
        .await
        .inspect_err(|e| warn!("prediction failed: {e}"))?;

    let prediction = round2(price);
    info!(size = features.size, bedrooms = features.bedrooms, age = features.age, price = prediction; "api prediction");

    Ok(Json(PredictResponse {
        prediction,
        features: features.into(),
        model_info: metadata::summary(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(state.health().await)
}

pub async fn info() -> Json<ModelInfo> {
    Json(metadata::info())
}
