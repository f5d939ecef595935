//! Document product endpoints (`/api/products`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::WithRejection;

use super::error::AppError;
use super::DeleteResponse;
use crate::app::AppState;
use crate::catalog::{NewProduct, Product, ProductPayload};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state
        .products
        .list()
        .await
        .map_err(|e| AppError::store(e, "Failed to fetch products"))?;

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ProductPayload>, AppError>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = NewProduct::try_from(payload)?;

    let created = state
        .products
        .create(product)
        .await
        .map_err(|e| AppError::store(e, "Failed to create product"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ProductPayload>, AppError>,
) -> Result<Json<Product>, AppError> {
    let product = NewProduct::try_from(payload)?;

    let updated = state
        .products
        .update(&id, product)
        .await
        .map_err(|e| AppError::store(e, "Failed to update product"))?;

    Ok(Json(updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state
        .products
        .delete(&id)
        .await
        .map_err(|e| AppError::store(e, "Failed to delete product"))?;

    Ok(Json(DeleteResponse::default()))
}
