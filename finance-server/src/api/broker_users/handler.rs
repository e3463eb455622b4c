//! Broker link API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::AppResult;
use shared::models::BrokerUser;

use crate::api::parse_id;
use crate::auth::CurrentUser;
use crate::state::AppState;

/// GET /api/me/brokers
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<BrokerUser>>> {
    Ok(Json(state.broker_users.list(current_user.id).await?))
}

/// POST /api/me/brokers/{broker_id}
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(broker_id): Path<String>,
) -> AppResult<Json<BrokerUser>> {
    let broker_id = parse_id(&broker_id, "broker_id")?;
    tracing::info!(user_id = current_user.id, broker_id, "Linking broker");
    Ok(Json(
        state.broker_users.create(current_user.id, broker_id).await?,
    ))
}

/// DELETE /api/me/brokers/{broker_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(broker_id): Path<String>,
) -> AppResult<Json<bool>> {
    let broker_id = parse_id(&broker_id, "broker_id")?;
    tracing::info!(user_id = current_user.id, broker_id, "Unlinking broker");
    state.broker_users.delete(current_user.id, broker_id).await?;
    Ok(Json(true))
}
