//! HTTP route handlers for the inventory service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings storage)
//!
//! # Adjustments (write)
//! POST /adjustments/add             - Receive stock into a warehouse
//! POST /adjustments/transfer        - Transfer stock between warehouses
//!
//! # Sales (write)
//! POST   /sales                     - Create a sale
//! DELETE /sales/{id}                - Delete a sale (elevated role only)
//!
//! # Analytics (read)
//! GET  /analytics/low-stock         - Items at or below reorder point
//! GET  /analytics/inventory-value   - Inventory valuation
//! GET  /analytics/stock-movement    - Movement time series (?days=N)
//! GET  /reports                     - Combined 30-day business report
//! ```

use axum::Router;

use crate::state::AppState;

pub mod adjustments;
pub mod analytics;
pub mod health;
pub mod sales;

/// Assemble the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(adjustments::routes())
        .merge(sales::routes())
        .merge(analytics::routes())
}
