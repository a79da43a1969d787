//! Admin error types and HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use clover_core::OrderStatus;

use crate::db::RepositoryError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Order status change rejected by the state machine.
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Image upload failed.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not signed in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is signed in but lacks the admin role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
            ) | Self::Internal(_)
        )
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, message) = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_owned()),
                RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                ),
            },
            Self::InvalidTransition { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Self::Upload(msg) => (StatusCode::BAD_REQUEST, format!("Upload failed: {msg}")),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {what}")),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AdminError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn invalid_transition_is_unprocessable() {
        assert_eq!(
            status_of(AdminError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn missing_role_is_forbidden() {
        assert_eq!(
            status_of(AdminError::Forbidden("admin role required".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn repository_not_found_is_404() {
        assert_eq!(
            status_of(AdminError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn missing_session_is_unauthorized() {
        assert_eq!(
            status_of(AdminError::Unauthorized("Admin sign in required".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn corrupt_data_is_a_server_error() {
        assert_eq!(
            status_of(AdminError::Database(RepositoryError::DataCorruption(
                "order vanished".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
