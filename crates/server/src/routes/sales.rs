//! Sale endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
};
use serde::Serialize;

use stockroom_core::SaleId;

use crate::error::AppError;
use crate::middleware::RequireElevated;
use crate::models::SaleWithItems;
use crate::services::CreateSaleRequest;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", post(create_sale))
        .route("/sales/{id}", delete(delete_sale))
}

/// `POST /sales` - create a sale aggregate.
async fn create_sale(
    State(state): State<AppState>,
    Json(request): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleWithItems>), AppError> {
    let sale = state.sales().create_sale(request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

#[derive(Debug, Serialize)]
struct DeleteSaleResponse {
    message: String,
}

/// `DELETE /sales/{id}` - delete a sale, restoring its stock. Elevated
/// roles only; the role check rejects before the core is reached.
async fn delete_sale(
    State(state): State<AppState>,
    RequireElevated(role): RequireElevated,
    Path(id): Path<SaleId>,
) -> Result<Json<DeleteSaleResponse>, AppError> {
    let sale = state.sales().delete_sale(id).await?;
    tracing::info!(%role, sale_id = %sale.sale.id, "sale deleted by elevated role");
    Ok(Json(DeleteSaleResponse {
        message: format!("sale {} deleted", sale.sale.reference_number),
    }))
}
