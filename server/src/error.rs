use std::{error::Error, fmt};

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ml_core::{ArtifactError, MlError};
use serde_json::json;

use crate::validation::ValidationError;

/// Everything a request can fail with, mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be decoded.
    Malformed { status: StatusCode, message: String },
    Validation(ValidationError),
    /// The artifact pair could not be loaded.
    Unavailable(ArtifactError),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Malformed { status, .. } => *status,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { message, .. } => write!(f, "invalid request: {message}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Unavailable(e) => write!(f, "model unavailable: {e}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ArtifactError> for ApiError {
    fn from(value: ArtifactError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<MlError> for ApiError {
    fn from(value: MlError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Malformed {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(value: FormRejection) -> Self {
        Self::Malformed {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let validation = ApiError::from(ValidationError::NotFinite { feature: "age" });
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(ArtifactError::Missing {
            path: PathBuf::from("artifacts/modelo.json"),
        });
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);

        let internal = ApiError::Internal("boom".into());
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = ApiError::from(ValidationError::NotFinite { feature: "size" });
        assert_eq!(err.to_string(), "size must be a finite number");
    }
}
