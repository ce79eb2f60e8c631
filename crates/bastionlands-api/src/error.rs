//! Mythic Bastionlands API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bastionlands_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The schema could not be brought up to date.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The tracing pipeline could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// An in-world line the client can show instead of the message.
    pub narrative: &'static str,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

const TROUBLED_REALM: &str =
    "A shadow falls across the Realm. The tale cannot continue just now.";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, narrative) = match &self.0 {
            DomainError::SessionNotFound(_) => (
                StatusCode::NOT_FOUND,
                "session_not_found",
                "No such tale is told in this land.",
            ),
            DomainError::CharacterNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "character_not_found",
                "No one of that name rides with the company.",
            ),
            DomainError::ConcurrencyConflict { .. } => (
                StatusCode::CONFLICT,
                "concurrency_conflict",
                "The threads of fate are tangled. Try again.",
            ),
            DomainError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "The Realm does not understand what you ask.",
            ),
            DomainError::Infrastructure(_) => {
                error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "infrastructure_error",
                    TROUBLED_REALM,
                )
            }
            DomainError::InvariantViolation(_) => {
                error!(error = %self.0, "invariant violated");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "invariant_violation",
                    TROUBLED_REALM,
                )
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            narrative,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::Value;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_session_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_of(DomainError::SessionNotFound(id)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_character_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::CharacterNotFound {
                session_id: Uuid::new_v4(),
                name: "Ser Nobody".into(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_concurrency_conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::ConcurrencyConflict {
                session_id: Uuid::new_v4(),
                expected: 1,
                actual: 2,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_and_invariant_map_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::InvariantViolation("turn overflow".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_carries_a_narrative_line() {
        // Arrange
        let response = ApiError(DomainError::Validation("bad input".into())).into_response();

        // Act
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();

        // Assert
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "validation error: bad input");
        assert!(!json["narrative"].as_str().unwrap().is_empty());
    }
}
