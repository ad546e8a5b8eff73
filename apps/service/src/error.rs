use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the management API.
///
/// Probe failures are never errors here: a completed-but-DOWN check is a
/// normal response body. Only an unknown endpoint, a bad registration, or a
/// collaborator failure reaches the caller as an error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("endpoint not found")]
    NotFound,
    #[error("endpoint URL already registered")]
    DuplicateUrl,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DuplicateUrl => StatusCode::CONFLICT,
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
