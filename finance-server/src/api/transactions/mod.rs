//! Transaction API module

mod handler;

use axum::routing::{delete, get};
use axum::{Router, middleware};

use crate::auth::{permissions, require_permission};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    // Ownership is enforced by the service
    let owner_routes = Router::new()
        .route("/api/transactions", get(handler::list).post(handler::create))
        .route(
            "/api/transactions/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        );

    let admin_routes = Router::new()
        .route(
            "/api/brokers/{id}/transactions",
            delete(handler::delete_by_broker),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission(permissions::TRANSACTION_DELETE_BY_BROKER),
        ));

    owner_routes.merge(admin_routes)
}
