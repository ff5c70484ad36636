//! HS256 token signing and verification.

use std::fmt;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::{AuthError, Identity, extract_bearer};

/// Default lifetime of issued tokens (1 hour).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Fixed user id stamped into issued tokens; there is a single account.
const ISSUED_USER_ID: u64 = 1;

/// Signs and verifies bearer tokens with a shared secret.
///
/// The secret is optional so that a missing secret surfaces as
/// [`AuthError::ServerMisconfigured`] on first use rather than at startup.
#[derive(Clone)]
pub struct TokenAuthority {
    secret: Option<String>,
    lifetime: Duration,
}

impl TokenAuthority {
    /// Create an authority. An empty secret counts as unset.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }

    /// Set the lifetime of issued tokens.
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], AuthError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or(AuthError::ServerMisconfigured)
    }

    /// Sign a token for `username`, valid for the configured lifetime.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let secret = self.secret()?;
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Identity {
            user_id: ISSUED_USER_ID,
            username: username.to_string(),
            issued_at: now,
            expires_at: now.saturating_add(self.lifetime.as_secs()),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(AuthError::Signing)
    }

    /// Verify a raw token's signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let secret = self.secret()?;
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired: no clock tolerance on `exp`.
        validation.leeway = 0;
        jsonwebtoken::decode::<Identity>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }

    /// Run the request gate over an optional `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = extract_bearer(header).ok_or(AuthError::MalformedToken)?;
        let identity = self.verify(token)?;
        debug!(username = %identity.username, "token verified");
        Ok(identity)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("configured", &self.is_configured())
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
