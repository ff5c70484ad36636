//! The single configured username/password pair.

use std::fmt;

use super::AuthError;

/// Username/password pair accepted by token issuance.
///
/// Exactly one pair is valid at a time.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build a pair only when both halves are present and non-empty.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some(Self::new(u, p)),
            _ => None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a submitted login against the configured pair.
    ///
    /// Missing input is reported before missing configuration, and missing
    /// configuration before a mismatch.
    pub fn check(
        configured: Option<&Credentials>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), AuthError> {
        let (Some(username), Some(password)) = (
            username.filter(|u| !u.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingCredentials);
        };

        let configured = configured.ok_or(AuthError::NotConfigured)?;
        if configured.username == username && configured.password == password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
