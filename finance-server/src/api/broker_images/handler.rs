//! Broker Image API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::AppResult;
use shared::models::{BrokerImage, BrokerImageCreate, BrokerImageUpdate};

use crate::api::{ApiJson, parse_id};
use crate::auth::CurrentUser;
use crate::state::AppState;

fn parse_pair(broker_id: &str, image_id: &str) -> AppResult<(i64, i64)> {
    Ok((parse_id(broker_id, "id")?, parse_id(image_id, "image_id")?))
}

/// GET /api/brokers/{id}/images
pub async fn list(
    State(state): State<AppState>,
    Path(broker_id): Path<String>,
) -> AppResult<Json<Vec<BrokerImage>>> {
    let broker_id = parse_id(&broker_id, "id")?;
    Ok(Json(state.broker_images.list(broker_id).await?))
}

/// GET /api/brokers/{id}/images/{image_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((broker_id, image_id)): Path<(String, String)>,
) -> AppResult<Json<BrokerImage>> {
    let (broker_id, image_id) = parse_pair(&broker_id, &image_id)?;
    Ok(Json(state.broker_images.get(broker_id, image_id).await?))
}

/// POST /api/brokers/{id}/images
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(broker_id): Path<String>,
    ApiJson(payload): ApiJson<BrokerImageCreate>,
) -> AppResult<Json<BrokerImage>> {
    let broker_id = parse_id(&broker_id, "id")?;
    tracing::info!(
        user_id = current_user.id,
        broker_id,
        size = payload.data.len(),
        "Creating broker image"
    );
    let image = state.broker_images.create(broker_id, payload).await?;
    tracing::info!(
        user_id = current_user.id,
        broker_id,
        image_id = image.id,
        "Broker image created"
    );
    Ok(Json(image))
}

/// PUT /api/brokers/{id}/images/{image_id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((broker_id, image_id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<BrokerImageUpdate>,
) -> AppResult<Json<BrokerImage>> {
    let (broker_id, image_id) = parse_pair(&broker_id, &image_id)?;
    tracing::info!(user_id = current_user.id, broker_id, image_id, "Updating broker image");
    Ok(Json(
        state
            .broker_images
            .update(broker_id, image_id, payload)
            .await?,
    ))
}

/// DELETE /api/brokers/{id}/images/{image_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((broker_id, image_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let (broker_id, image_id) = parse_pair(&broker_id, &image_id)?;
    tracing::info!(user_id = current_user.id, broker_id, image_id, "Deleting broker image");
    state.broker_images.delete(broker_id, image_id).await?;
    Ok(Json(true))
}
