//! The adjustment engine: validated, atomic stock receipts and transfers.

use std::sync::Arc;

use serde::Deserialize;

use stockroom_core::{ItemId, ReferenceNumber, StockQuantity, WarehouseId};

use crate::db::InventoryStore;
use crate::error::AppError;
use crate::models::{AddStockAdjustment, NewAddStock, NewTransferStock, TransferStockAdjustment};
use crate::services::activity::{ActivityAction, ActivityEvent, ActivityLog};

/// Request body for `POST /adjustments/add`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStockRequest {
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub add_stock_quantity: i32,
    pub reference_number: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /adjustments/transfer`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStockRequest {
    pub item_id: ItemId,
    pub giving_warehouse_id: WarehouseId,
    pub receiving_warehouse_id: WarehouseId,
    pub transfer_stock_quantity: i32,
    pub reference_number: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validates and atomically applies stock receipts and transfers.
#[derive(Clone)]
pub struct AdjustmentService {
    store: Arc<dyn InventoryStore>,
    activity: ActivityLog,
}

impl AdjustmentService {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, activity: ActivityLog) -> Self {
        Self { store, activity }
    }

    /// Receive stock: create an `AddStockAdjustment` ledger row and
    /// increment the item's quantity in one atomic unit.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive quantity or empty reference number,
    /// `NotFound` for an unresolvable item or warehouse, `Database` when the
    /// transaction fails to commit (no partial state).
    pub async fn add_stock(
        &self,
        request: AddStockRequest,
    ) -> Result<AddStockAdjustment, AppError> {
        let quantity =
            StockQuantity::new(request.add_stock_quantity).map_err(|err| AppError::Validation {
                field: "addStockQuantity",
                message: err.to_string(),
            })?;
        let reference_number = ReferenceNumber::parse(&request.reference_number).map_err(|err| {
            AppError::Validation {
                field: "referenceNumber",
                message: err.to_string(),
            }
        })?;

        self.resolve_item(request.item_id).await?;
        self.resolve_warehouse(request.warehouse_id).await?;

        let input = NewAddStock {
            item_id: request.item_id,
            warehouse_id: request.warehouse_id,
            quantity,
            reference_number,
            notes: request.notes,
        };
        let adjustment = self.store.apply_add_stock(&input).await?;

        tracing::info!(
            item_id = %adjustment.item_id,
            warehouse_id = %adjustment.warehouse_id,
            quantity = adjustment.quantity,
            reference = %adjustment.reference_number,
            "stock received"
        );
        self.activity.record(
            ActivityEvent::new(
                ActivityAction::StockAdded,
                "add_stock_adjustment",
                adjustment.id.as_i32(),
            )
            .with_reference(&adjustment.reference_number)
            .with_quantity(adjustment.quantity),
        );

        Ok(adjustment)
    }

    /// Transfer stock between warehouses: create a
    /// `TransferStockAdjustment` ledger row and decrement the item's
    /// quantity in one atomic unit.
    ///
    /// # Errors
    ///
    /// As [`Self::add_stock`], plus `Validation` when the giving and
    /// receiving warehouses are the same and `InsufficientStock` when the
    /// requested quantity exceeds current on-hand.
    pub async fn transfer_stock(
        &self,
        request: TransferStockRequest,
    ) -> Result<TransferStockAdjustment, AppError> {
        let quantity = StockQuantity::new(request.transfer_stock_quantity).map_err(|err| {
            AppError::Validation {
                field: "transferStockQuantity",
                message: err.to_string(),
            }
        })?;
        let reference_number = ReferenceNumber::parse(&request.reference_number).map_err(|err| {
            AppError::Validation {
                field: "referenceNumber",
                message: err.to_string(),
            }
        })?;

        if request.giving_warehouse_id == request.receiving_warehouse_id {
            return Err(AppError::Validation {
                field: "receivingWarehouseId",
                message: "giving and receiving warehouse must differ".to_owned(),
            });
        }

        self.resolve_item(request.item_id).await?;
        self.resolve_warehouse(request.giving_warehouse_id).await?;
        self.resolve_warehouse(request.receiving_warehouse_id)
            .await?;

        let input = NewTransferStock {
            item_id: request.item_id,
            giving_warehouse_id: request.giving_warehouse_id,
            receiving_warehouse_id: request.receiving_warehouse_id,
            quantity,
            reference_number,
            notes: request.notes,
        };
        let adjustment = self.store.apply_transfer_stock(&input).await?;

        tracing::info!(
            item_id = %adjustment.item_id,
            giving_warehouse_id = %adjustment.giving_warehouse_id,
            receiving_warehouse_id = %adjustment.receiving_warehouse_id,
            quantity = adjustment.quantity,
            reference = %adjustment.reference_number,
            "stock transferred"
        );
        self.activity.record(
            ActivityEvent::new(
                ActivityAction::StockTransferred,
                "transfer_stock_adjustment",
                adjustment.id.as_i32(),
            )
            .with_reference(&adjustment.reference_number)
            .with_quantity(adjustment.quantity),
        );

        Ok(adjustment)
    }

    async fn resolve_item(&self, id: ItemId) -> Result<(), AppError> {
        self.store
            .item(id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound {
                entity: "item",
                id: id.as_i32(),
            })
    }

    async fn resolve_warehouse(&self, id: WarehouseId) -> Result<(), AppError> {
        self.store
            .warehouse(id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound {
                entity: "warehouse",
                id: id.as_i32(),
            })
    }
}
