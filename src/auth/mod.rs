//! Bearer-token authentication.
//!
//! - [`TokenAuthority`] signs and verifies HS256 tokens against the shared
//!   secret, and implements the request gate ([`TokenAuthority::authorize`]).
//! - [`Credentials`] is the single accepted username/password pair used when
//!   issuing tokens.
//!
//! # Gate ordering
//!
//! [`TokenAuthority::authorize`] checks, in order and short-circuiting:
//!
//! 1. header present, else [`AuthError::MissingToken`]
//! 2. header carries a `<scheme> <token>` pair, else [`AuthError::MalformedToken`]
//! 3. a signing secret is configured, else [`AuthError::ServerMisconfigured`]
//! 4. the token verifies, else [`AuthError::InvalidToken`]
//!
//! Verification is pure computation and is never retried.

mod credentials;
mod token;

pub use credentials::Credentials;
pub use token::{DEFAULT_TOKEN_LIFETIME, TokenAuthority};

use serde::{Deserialize, Serialize};

/// Authentication failures.
///
/// Display strings are for logs only. What a caller gets to see is decided
/// at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingToken,

    #[error("authorization header is not of the form '<scheme> <token>'")]
    MalformedToken,

    #[error("token signing secret is not configured")]
    ServerMisconfigured,

    #[error("token rejected: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("username or password missing")]
    MissingCredentials,

    #[error("credentials do not match")]
    InvalidCredentials,

    #[error("no credential pair configured")]
    NotConfigured,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Whether this is an operational fault rather than a caller mistake.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AuthError::ServerMisconfigured | AuthError::NotConfigured | AuthError::Signing(_)
        )
    }
}

/// Claims carried by a verified token.
///
/// Attached to the request by the gate and readable by downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Absent in tokens signed elsewhere; defaults to 0.
    #[serde(rename = "userId", default)]
    pub user_id: u64,
    pub username: String,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(rename = "iat", default)]
    pub issued_at: u64,
    /// Expiry, seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: u64,
}

/// Extract the token from an `Authorization` header value.
///
/// The header must split on a single space into at least two segments with a
/// non-empty second one. The scheme itself is not checked.
pub fn extract_bearer(header: &str) -> Option<&str> {
    header.split(' ').nth(1).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_takes_second_segment() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Token xyz"), Some("xyz"));
    }

    #[test]
    fn extract_bearer_rejects_missing_token() {
        assert_eq!(extract_bearer("Bearer"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer(""), None);
    }
}
