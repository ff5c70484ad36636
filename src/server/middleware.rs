//! Request gate and request tracking middleware.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiResult;
use super::state::AppState;

/// Bearer-token gate.
///
/// On success the verified [`Identity`](crate::Identity) is inserted into the
/// request extensions for downstream handlers. A header that is present but
/// not valid UTF-8 is treated as malformed.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let identity = state.tokens.authorize(header)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Record every request's method, route template, status, and duration.
///
/// Unmatched requests fall back to the literal path.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    state
        .metrics()
        .track_request(method.as_str(), &path, response.status().as_u16(), elapsed);

    response
}
