//! Read-only analytics and reporting endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{BusinessReport, InventoryValuation, LowStockReport, StockMovement};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/low-stock", get(low_stock))
        .route("/analytics/inventory-value", get(inventory_value))
        .route("/analytics/stock-movement", get(stock_movement))
        .route("/reports", get(report))
}

/// `GET /analytics/low-stock`
async fn low_stock(State(state): State<AppState>) -> Result<Json<LowStockReport>, AppError> {
    Ok(Json(state.analytics().low_stock().await?))
}

/// `GET /analytics/inventory-value`
async fn inventory_value(
    State(state): State<AppState>,
) -> Result<Json<InventoryValuation>, AppError> {
    Ok(Json(state.analytics().inventory_valuation().await?))
}

#[derive(Debug, Deserialize)]
struct MovementParams {
    /// Trailing window in days; falls back to the configured default.
    days: Option<u32>,
}

/// `GET /analytics/stock-movement?days=N`
async fn stock_movement(
    State(state): State<AppState>,
    Query(params): Query<MovementParams>,
) -> Result<Json<StockMovement>, AppError> {
    Ok(Json(state.analytics().stock_movement(params.days).await?))
}

/// `GET /reports`
async fn report(State(state): State<AppState>) -> Result<Json<BusinessReport>, AppError> {
    Ok(Json(state.analytics().report().await?))
}
