//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::middleware::PageContext;
use crate::routes::NotFoundTemplate;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Request named something that does not exist, such as a malformed book id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Page requires a logged-in user; a notice has already been queued.
    #[error("Not logged in")]
    Unauthenticated,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Auth(AuthError::InvalidCredentials) | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::DuplicateRegistration { .. }) => StatusCode::CONFLICT,
            Self::Database(_)
            | Self::Auth(_)
            | Self::Session(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Unauthenticated => Redirect::to("/login").into_response(),
            _ if status == StatusCode::NOT_FOUND => (
                status,
                NotFoundTemplate {
                    ctx: PageContext::default(),
                },
            )
                .into_response(),
            // Don't expose internal error details to clients
            _ if status.is_server_error() => (status, "Internal server error").into_response(),
            Self::Auth(AuthError::InvalidCredentials) => {
                (status, "Invalid email address or password.").into_response()
            }
            Self::Auth(AuthError::DuplicateRegistration { .. })
            | Self::Database(RepositoryError::Conflict(_)) => {
                (status, "Already exists").into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("book 42".to_string());
        assert_eq!(err.to_string(), "Not found: book 42");

        let err = AppError::Unauthenticated;
        assert_eq!(err.to_string(), "Not logged in");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = AppError::Unauthenticated.into_response();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response =
            AppError::Internal("connection refused at 10.0.0.5".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }

    #[tokio::test]
    async fn test_not_found_renders_page() {
        let response = AppError::NotFound("book 7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Page not found"));
    }
}
