// handlers/protected/products.rs - /products CRUD, caller resolved by the auth gate

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{NewProduct, Product, ProductPatch};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /products/ - every product owned by the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.products.list(caller.user_id).await?;
    Ok(Json(products))
}

/// POST /products - create a product owned by the caller
///
/// Body: `{"name": string, "description"?: string, "price": number}`
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(input) = payload?;
    let product = state.products.create(caller.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id - apply the supplied fields to a product the caller owns
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;
    let Json(patch) = payload?;
    let product = state.products.update(caller.user_id, id, patch).await?;
    Ok(Json(product))
}

/// DELETE /products/:id - remove a product the caller owns
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_product_id(&id)?;
    state.products.delete(caller.user_id, id).await?;
    Ok(Json(json!({ "message": "Product removed" })))
}

/// An id that cannot name any product is reported like a missing one
fn parse_product_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Product not found"))
}
