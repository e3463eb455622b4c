//! Broker API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::AppResult;
use shared::models::{Broker, BrokerCreate, BrokerUpdate};

use crate::api::{ApiJson, parse_id};
use crate::auth::CurrentUser;
use crate::state::AppState;

/// GET /api/brokers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Broker>>> {
    Ok(Json(state.brokers.list().await?))
}

/// GET /api/brokers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Broker>> {
    let id = parse_id(&id, "id")?;
    Ok(Json(state.brokers.get(id).await?))
}

/// POST /api/brokers
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<BrokerCreate>,
) -> AppResult<Json<Broker>> {
    tracing::info!(user_id = current_user.id, name = %payload.name, "Creating broker");
    let broker = state.brokers.create(payload).await?;
    tracing::info!(user_id = current_user.id, broker_id = broker.id, "Broker created");
    Ok(Json(broker))
}

/// PUT /api/brokers/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BrokerUpdate>,
) -> AppResult<Json<Broker>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, broker_id = id, "Updating broker");
    Ok(Json(state.brokers.update(id, payload).await?))
}

/// POST /api/brokers/{id}/enable
pub async fn enable(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Broker>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, broker_id = id, "Enabling broker");
    Ok(Json(state.brokers.enable(id).await?))
}

/// POST /api/brokers/{id}/disable
pub async fn disable(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Broker>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, broker_id = id, "Disabling broker");
    Ok(Json(state.brokers.disable(id).await?))
}

/// DELETE /api/brokers/{id}
///
/// Links, images and transactions of the broker are not touched.
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, broker_id = id, "Deleting broker");
    state.brokers.delete(id).await?;
    Ok(Json(true))
}
