use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use service::errors::ServiceError;

/// Handler-boundary error. Every failure leaving a handler becomes a
/// well-formed `{"error": ...}` JSON body with an appropriate status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::NotConfigured(_) | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Mismatch(_) | ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Model(m) => return Self::from_model(m),
        };
        Self::new(status, e.to_string())
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        Self::from_model(&e)
    }
}

impl ApiError {
    fn from_model(e: &models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::bad_request(msg.clone()),
            models::errors::ModelError::Db(msg) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("database error: {msg}"))
            }
        }
    }
}
