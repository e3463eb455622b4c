//! Transaction API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::AppResult;
use shared::models::{Transaction, TransactionInput};

use crate::api::{ApiJson, parse_id};
use crate::auth::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub broker_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

/// GET /api/transactions?broker_id=
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    let broker_id = query
        .broker_id
        .as_deref()
        .map(|raw| parse_id(raw, "broker_id"))
        .transpose()?;
    Ok(Json(
        state
            .transactions
            .list(current_user.id, broker_id)
            .await?,
    ))
}

/// GET /api/transactions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id(&id, "id")?;
    Ok(Json(state.transactions.get(current_user.id, id).await?))
}

/// POST /api/transactions
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<TransactionInput>,
) -> AppResult<Json<Transaction>> {
    tracing::info!(
        user_id = current_user.id,
        broker_id = payload.broker_id,
        "Creating transaction"
    );
    let tx = state.transactions.create(current_user.id, payload).await?;
    tracing::info!(user_id = current_user.id, transaction_id = tx.id, "Transaction created");
    Ok(Json(tx))
}

/// PUT /api/transactions/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TransactionInput>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, transaction_id = id, "Updating transaction");
    Ok(Json(
        state
            .transactions
            .update(current_user.id, id, payload)
            .await?,
    ))
}

/// DELETE /api/transactions/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let id = parse_id(&id, "id")?;
    tracing::info!(user_id = current_user.id, transaction_id = id, "Deleting transaction");
    state.transactions.delete(current_user.id, id).await?;
    Ok(Json(true))
}

/// DELETE /api/brokers/{id}/transactions
pub async fn delete_by_broker(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(broker_id): Path<String>,
) -> AppResult<Json<DeletedCount>> {
    let broker_id = parse_id(&broker_id, "id")?;
    let deleted = state.transactions.delete_by_broker(broker_id).await?;
    tracing::info!(
        user_id = current_user.id,
        broker_id,
        deleted,
        "Deleted transactions of broker"
    );
    Ok(Json(DeletedCount { deleted }))
}
