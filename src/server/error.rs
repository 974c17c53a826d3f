//! Error types for the dashboard API

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// No route matches the request path
    NotFound(Uri),
    /// Statistics or chart computation failed
    ComputationFailed(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(uri) => write!(f, "Not found: {}", uri),
            ApiError::ComputationFailed(msg) => write!(f, "Computation failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(uri) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                format!("No page or endpoint at '{}'", uri.path()),
            ),
            ApiError::ComputationFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ComputationFailed",
                msg.clone(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

// Conversions from other error types

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::ComputationFailed(format!("background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound(Uri::from_static("/nope")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn panicked_task_is_a_computation_failure() {
        let join_error = tokio::task::spawn_blocking(|| -> usize { panic!("derivation panicked") })
            .await
            .unwrap_err();
        let err = ApiError::from(join_error);
        assert!(matches!(err, ApiError::ComputationFailed(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
