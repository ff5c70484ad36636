//! Route definitions

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::{require_bearer, track_requests};
use super::state::AppState;

/// Routes behind the bearer-token gate.
fn weather_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/weather/:city", get(handlers::weather))
        .route("/weather", get(handlers::missing_city))
        .route("/weather/", get(handlers::missing_city))
        .route_layer(from_fn_with_state(state.clone(), require_bearer))
}

/// Unauthenticated routes.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/get-token", post(handlers::issue_token))
        .route("/status", get(handlers::status))
        .route("/metrics", get(handlers::metrics))
}

/// The complete application router.
///
/// Request tracking wraps every route, including gate rejections, so that
/// 401/403 responses show up in the error tally.
pub fn router(state: AppState) -> Router {
    public_routes()
        .merge(weather_routes(&state))
        .layer(from_fn_with_state(state.clone(), track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
