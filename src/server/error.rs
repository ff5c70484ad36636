//! HTTP error mapping.
//!
//! [`ApiError`] is the only place where internal failures become status
//! codes. Bodies are always `{"error": "<message>"}` with a fixed, short
//! message; the underlying detail goes to the log only.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::GatewayError;
use crate::auth::AuthError;

/// Errors surfaced by HTTP handlers and middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("city parameter missing")]
    MissingCity,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Lookup(#[from] GatewayError),
}

impl ApiError {
    /// Status code and public message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingCity => (StatusCode::BAD_REQUEST, "City parameter is required"),
            ApiError::Auth(err) => match err {
                AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "No token"),
                AuthError::MalformedToken => (StatusCode::UNAUTHORIZED, "Invalid token format"),
                AuthError::InvalidToken(_) => (StatusCode::FORBIDDEN, "Invalid token"),
                AuthError::MissingCredentials => (
                    StatusCode::BAD_REQUEST,
                    "Username and password are required",
                ),
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
                AuthError::NotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Authentication not configured",
                ),
                AuthError::ServerMisconfigured | AuthError::Signing(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error",
                ),
            },
            ApiError::Lookup(err) if err.is_configuration() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error",
            ),
            ApiError::Lookup(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Weather fetch failed"),
        }
    }

    fn log(&self, status: StatusCode) {
        let is_config = match self {
            ApiError::MissingCity => false,
            ApiError::Auth(err) => err.is_configuration(),
            ApiError::Lookup(err) => err.is_configuration(),
        };

        if is_config {
            error!(status = status.as_u16(), error = %self, "configuration fault");
        } else if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else if matches!(self, ApiError::Auth(_)) {
            warn!(status = status.as_u16(), error = %self, "authentication rejected");
        } else {
            debug!(status = status.as_u16(), error = %self, "bad request");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        self.log(status);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
