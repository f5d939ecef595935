//! Relational item endpoints (`/api/items`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::WithRejection;

use super::error::AppError;
use super::DeleteResponse;
use crate::app::AppState;
use crate::catalog::{Item, ItemPayload, NewItem};

pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    let items = state
        .items
        .list()
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch items"))?;

    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ItemPayload>, AppError>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let item = NewItem::try_from(payload)?;

    let created = state
        .items
        .create(item)
        .await
        .map_err(|e| AppError::store(e, "Failed to create item"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ItemPayload>, AppError>,
) -> Result<Json<Item>, AppError> {
    let id = parse_id(&id)?;
    let item = NewItem::try_from(payload)?;

    let updated = state
        .items
        .update(id, item)
        .await
        .map_err(|e| AppError::store(e, "Failed to update item"))?;

    Ok(Json(updated))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_id(&id)?;

    state
        .items
        .delete(id)
        .await
        .map_err(|e| AppError::store(e, "Failed to delete item"))?;

    Ok(Json(DeleteResponse::default()))
}

/// A path id that is not an integer cannot name any row
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Item not found".to_string()))
}
