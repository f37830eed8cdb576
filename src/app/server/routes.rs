use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use super::AppState;
use super::error::ApiError;
use crate::app::models::CardRecord;
use crate::app::services::card_reader::CardReader;
use crate::constants::ROOT_BANNER;

/// Query string of the read endpoint
#[derive(Debug, Deserialize)]
pub struct ReadParams {
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Root endpoint
pub async fn index() -> impl IntoResponse {
    ROOT_BANNER
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Read the card in the reader
pub async fn read_card<R: CardReader + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ReadParams>,
) -> Result<Json<CardRecord>, ApiError> {
    let provided = params.token.unwrap_or_default();
    if !token_matches(&provided, &state.auth_token) {
        tracing::warn!("Rejected read with invalid token");
        return Err(ApiError::Unauthorized);
    }

    let record = state.service.read_card().await?;
    Ok(Json(record))
}

/// Compare tokens without leaking the matching prefix length through timing
fn token_matches(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::token_matches;

    #[test]
    fn test_token_matches() {
        assert!(token_matches("s3cret", "s3cret"));
        assert!(!token_matches("s3cre", "s3cret"));
        assert!(!token_matches("", "s3cret"));
        assert!(!token_matches("", ""));
    }
}
