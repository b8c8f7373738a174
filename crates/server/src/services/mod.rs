//! Service layer: the write engines, the sale processor, the analytics
//! aggregator, and the audit pipeline.

pub mod activity;
pub mod adjustments;
pub mod analytics;
pub mod sales;

pub use activity::{ActivityAction, ActivityEvent, ActivityLog, ActivitySink, MemorySink, TracingSink};
pub use adjustments::{AddStockRequest, AdjustmentService, TransferStockRequest};
pub use analytics::AnalyticsService;
pub use sales::{CreateSaleRequest, SaleLineRequest, SaleService};
