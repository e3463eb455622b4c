//! Broker API module

mod handler;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};

use crate::auth::{permissions, require_permission};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/api/brokers", get(handler::list))
        .route("/api/brokers/{id}", get(handler::get_by_id));

    let create_routes = Router::new()
        .route("/api/brokers", post(handler::create))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_CREATE),
        ));

    let update_routes = Router::new()
        .route("/api/brokers/{id}", put(handler::update))
        .route("/api/brokers/{id}/enable", post(handler::enable))
        .route("/api/brokers/{id}/disable", post(handler::disable))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_UPDATE),
        ));

    let delete_routes = Router::new()
        .route("/api/brokers/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_DELETE),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
