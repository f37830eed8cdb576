use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Errors returned by the HTTP endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid token")]
    Unauthorized,

    #[error(transparent)]
    Card(#[from] Error),
}

impl ApiError {
    /// Status code and machine-readable code for this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Card(Error::CardNotPresent) => (StatusCode::NOT_FOUND, "CARD_NOT_PRESENT"),
            ApiError::Card(Error::ExternalToolFailure { .. } | Error::FieldParse { .. }) => {
                (StatusCode::BAD_GATEWAY, "READER_FAILURE")
            }
            ApiError::Card(Error::ReaderTimeout { .. }) => {
                (StatusCode::GATEWAY_TIMEOUT, "READER_TIMEOUT")
            }
            ApiError::Card(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!(code, "Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}
