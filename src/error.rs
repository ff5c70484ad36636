//! Weathergate error types

/// Errors raised by the weather lookup path and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    /// The upstream API key is not configured. Detected on first use.
    #[error("upstream API key is not configured")]
    MissingApiKey,

    #[error("no weather provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Whether this error is an operational fault rather than an upstream failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingApiKey | GatewayError::NoProvider | GatewayError::Configuration(_)
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string.
        GatewayError::Http(err.without_url().to_string())
    }
}

/// Result type alias for Weathergate operations
pub type Result<T> = std::result::Result<T, GatewayError>;
