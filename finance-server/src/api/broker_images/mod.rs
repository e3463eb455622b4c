//! Broker Image API module

mod handler;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};

use crate::auth::{permissions, require_permission};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/api/brokers/{id}/images", get(handler::list))
        .route("/api/brokers/{id}/images/{image_id}", get(handler::get_by_id));

    let create_routes = Router::new()
        .route("/api/brokers/{id}/images", post(handler::create))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_IMAGE_CREATE),
        ));

    let update_routes = Router::new()
        .route("/api/brokers/{id}/images/{image_id}", put(handler::update))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_IMAGE_UPDATE),
        ));

    let delete_routes = Router::new()
        .route("/api/brokers/{id}/images/{image_id}", delete(handler::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::BROKER_IMAGE_DELETE),
        ));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
