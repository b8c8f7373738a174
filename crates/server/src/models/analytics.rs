//! Read-side aggregate shapes produced by the analytics aggregator.
//!
//! These are plain serializable views; all the math lives in
//! `services::analytics`. Missing optional relations (category, brand,
//! warehouse, unit) render as the label `"Unknown"` rather than failing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::ItemId;

/// Severity of a low-stock flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowStockSeverity {
    /// At or below the reorder point but still in stock.
    Warning,
    /// Out of stock entirely.
    Critical,
}

/// One item flagged as low-stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub item_id: ItemId,
    pub title: String,
    pub sku: String,
    pub quantity: i32,
    pub reorder_point: i32,
    pub category: String,
    pub brand: String,
    pub unit: String,
    pub warehouse: String,
    pub severity: LowStockSeverity,
}

/// Low-stock detection result, partitioned by severity.
///
/// Both partitions are ordered ascending by quantity. Items with a null
/// reorder point never appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockReport {
    pub warning: Vec<LowStockItem>,
    pub critical: Vec<LowStockItem>,
}

/// Valuation subtotal for one category or warehouse group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationGroup {
    pub label: String,
    pub item_count: u32,
    pub total_value: Decimal,
    pub total_cost: Decimal,
}

/// Inventory valuation over current committed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    /// Σ quantity × selling price.
    pub total_inventory_value: Decimal,
    /// Σ quantity × buying price.
    pub total_cost_value: Decimal,
    /// (value − cost) / value × 100; exactly 0 when value is 0.
    pub profit_margin: Decimal,
    pub by_category: Vec<ValuationGroup>,
    pub by_warehouse: Vec<ValuationGroup>,
}

/// Movement totals for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovement {
    pub date: NaiveDate,
    pub added: i64,
    pub transferred: i64,
}

/// Movement totals for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMovement {
    pub item_id: ItemId,
    pub title: String,
    pub added: i64,
    pub transferred: i64,
}

/// Movement totals for one warehouse.
///
/// Receipts count toward the receiving warehouse; transfers count toward the
/// giving warehouse (source-side accounting).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseMovement {
    pub warehouse: String,
    pub added: i64,
    pub transferred: i64,
}

/// Stock movement time series over a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub window_days: u32,
    pub total_added: i64,
    pub total_transferred: i64,
    /// (recent 7 days − previous 7 days) / previous 7 days × 100, over total
    /// moved units; exactly 0 when the previous period is 0.
    pub growth_rate: f64,
    pub by_day: Vec<DailyMovement>,
    pub by_item: Vec<ItemMovement>,
    pub by_warehouse: Vec<WarehouseMovement>,
}

/// One entry of the top-selling-items list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingItem {
    pub item_id: ItemId,
    pub title: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

/// Combined 30-day reporting view over sales, inventory, and adjustments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessReport {
    pub period_days: u32,
    /// Σ sale total amounts in the window.
    pub total_sales: Decimal,
    /// Σ quantity sold in the window.
    pub total_sales_quantity: i64,
    /// Σ per sale line: (selling price − buying price) × quantity sold.
    pub total_profit: Decimal,
    /// Σ per sale line: revenue × tax rate / 100.
    pub total_tax: Decimal,
    /// Top 10 items by quantity sold.
    pub top_selling_items: Vec<TopSellingItem>,
    /// Top 10 low-stock items, ascending by quantity.
    pub low_stock_items: Vec<LowStockItem>,
}
