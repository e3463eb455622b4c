//! Caller's broker links
//!
//! Authenticated only: a caller manages their own links.

mod handler;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/me/brokers", get(handler::list))
        .route(
            "/api/me/brokers/{broker_id}",
            post(handler::create).delete(handler::delete),
        )
}
