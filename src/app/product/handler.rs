//! 产品处理器

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use super::{
    extract::{NumericId, ValidProduct},
    model::Product,
    repository::ProductRepository,
};
use crate::core::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.repository.find_all().await?;
    Ok(Json(products))
}

pub async fn create(
    State(state): State<AppState>,
    ValidProduct(product): ValidProduct,
) -> Result<StatusCode, ApiError> {
    state.repository.create(&product).await?;
    info!("Created product: {}", product.name);
    Ok(StatusCode::OK)
}

pub async fn update(
    State(state): State<AppState>,
    ValidProduct(product): ValidProduct,
) -> Result<StatusCode, ApiError> {
    state.repository.update(&product).await?;
    info!("Updated product: {} ({})", product.name, product.id);
    Ok(StatusCode::OK)
}

pub async fn delete(
    State(state): State<AppState>,
    id: NumericId,
) -> Result<StatusCode, ApiError> {
    let id = id.parse()?;
    state.repository.delete(id).await?;
    info!("Deleted product: {}", id);
    Ok(StatusCode::OK)
}
