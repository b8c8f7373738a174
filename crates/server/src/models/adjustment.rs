//! Stock ledger event models for manual receipts and inter-warehouse transfers.
//!
//! Ledger rows are append-only: corrections are new compensating events,
//! never edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{
    AddStockAdjustmentId, ItemId, ReferenceNumber, StockQuantity, TransferStockAdjustmentId,
    WarehouseId,
};

/// An immutable ledger row recording a manual stock receipt.
///
/// On-hand delta: `+quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockAdjustment {
    pub id: AddStockAdjustmentId,
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    /// Units received (always positive).
    #[serde(rename = "addStockQuantity")]
    pub quantity: i32,
    pub reference_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An immutable ledger row recording an inter-warehouse transfer.
///
/// On-hand delta: `-quantity`. Source-side accounting only: the receiving
/// warehouse is recorded for audit but does not credit a separate count,
/// since on-hand quantity is tracked globally per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStockAdjustment {
    pub id: TransferStockAdjustmentId,
    pub item_id: ItemId,
    pub giving_warehouse_id: WarehouseId,
    pub receiving_warehouse_id: WarehouseId,
    /// Units moved (always positive).
    #[serde(rename = "transferStockQuantity")]
    pub quantity: i32,
    pub reference_number: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a stock receipt, ready for the storage layer.
#[derive(Debug, Clone)]
pub struct NewAddStock {
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub quantity: StockQuantity,
    pub reference_number: ReferenceNumber,
    pub notes: Option<String>,
}

/// Validated input for an inter-warehouse transfer.
#[derive(Debug, Clone)]
pub struct NewTransferStock {
    pub item_id: ItemId,
    pub giving_warehouse_id: WarehouseId,
    pub receiving_warehouse_id: WarehouseId,
    pub quantity: StockQuantity,
    pub reference_number: ReferenceNumber,
    pub notes: Option<String>,
}
