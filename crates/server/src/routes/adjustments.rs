//! Stock adjustment endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::error::AppError;
use crate::models::{AddStockAdjustment, TransferStockAdjustment};
use crate::services::{AddStockRequest, TransferStockRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments/add", post(add_stock))
        .route("/adjustments/transfer", post(transfer_stock))
}

/// `POST /adjustments/add` - receive stock into a warehouse.
async fn add_stock(
    State(state): State<AppState>,
    Json(request): Json<AddStockRequest>,
) -> Result<(StatusCode, Json<AddStockAdjustment>), AppError> {
    let adjustment = state.adjustments().add_stock(request).await?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}

/// `POST /adjustments/transfer` - move stock between warehouses.
async fn transfer_stock(
    State(state): State<AppState>,
    Json(request): Json<TransferStockRequest>,
) -> Result<(StatusCode, Json<TransferStockAdjustment>), AppError> {
    let adjustment = state.adjustments().transfer_stock(request).await?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}
