//! HTTP API
//!
//! Every `/api/` route requires a bearer token. Privileged route groups add a
//! permission gate on top through `route_layer`.

pub mod broker_images;
pub mod broker_users;
pub mod brokers;
pub mod extract;
pub mod health;
pub mod transactions;

pub use extract::ApiJson;

use axum::routing::get;
use axum::{Router, middleware};
use shared::{AppError, AppResult};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(brokers::router(&state))
        .merge(broker_images::router(&state))
        .merge(broker_users::router())
        .merge(transactions::router(&state))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse a decimal id taken from the path or query string
pub(crate) fn parse_id(raw: &str, field: &str) -> AppResult<i64> {
    shared::util::parse_id(raw).ok_or_else(|| AppError::invalid_id(field, raw))
}
