//! HTTP handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::{Credentials, Identity};
use crate::telemetry::MetricsSnapshot;
use crate::types::Units;
use crate::version;

/// Response header reporting whether a lookup was served from the cache.
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";

/// Login body for `POST /get-token`. Both fields are optional so that a
/// missing field maps to a 400 rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /get-token`
pub async fn issue_token(
    State(state): State<AppState>,
    body: Option<Json<TokenRequest>>,
) -> ApiResult<Json<TokenResponse>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    Credentials::check(
        state.credentials.as_deref(),
        request.username.as_deref(),
        request.password.as_deref(),
    )?;

    // Checked above: present and non-empty.
    let username = request.username.unwrap_or_default();
    let token = state.tokens.issue(&username)?;
    info!(%username, "issued token");

    Ok(Json(TokenResponse { token }))
}

/// `GET /weather/:city`
pub async fn weather(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(city): Path<String>,
) -> ApiResult<Response> {
    if city.trim().is_empty() {
        return Err(ApiError::MissingCity);
    }

    let lookup = state.gateway.lookup(&city).await?;
    debug!(%city, username = %identity.username, from_cache = lookup.from_cache, "weather served");

    let cache_status = if lookup.from_cache { "HIT" } else { "MISS" };
    let mut response = Json(lookup.report).into_response();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
    Ok(response)
}

/// `GET /weather` and `GET /weather/`: the city segment is missing.
pub async fn missing_city() -> ApiError {
    ApiError::MissingCity
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub config: StatusConfig,
    pub git: GitInfo,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusConfig {
    /// Cache TTL in seconds.
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u64,
    pub units: Units,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GitInfo {
    pub commit: String,
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        config: StatusConfig {
            cache_ttl: state.gateway.cache().ttl().as_secs(),
            units: state.gateway.units(),
        },
        git: GitInfo {
            commit: version::git_commit().to_string(),
        },
    })
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics().snapshot())
}
