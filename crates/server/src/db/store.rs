//! The storage seam between services and persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockroom_core::{ItemId, SaleId, WarehouseId};

use super::RepositoryError;
use crate::models::{
    AddStockAdjustment, Brand, Category, Item, NewAddStock, NewTransferStock, SaleLine,
    SaleWithItems, TransferStockAdjustment, Unit, Warehouse,
};

/// Storage operations required by the adjustment engine, the sale processor,
/// and the analytics aggregator.
///
/// # Atomicity contract
///
/// Every mutating method executes as one atomic unit: the ledger row(s) and
/// the `item.quantity` change commit together or not at all, and the
/// operation holds effective exclusivity over the target item row for its
/// read-check-mutate sequence. Quantity mutation is expressed as a
/// storage-level conditional increment/decrement, never as application-level
/// read-then-write, so concurrent operations on the same item cannot lose
/// updates.
///
/// Read methods observe current committed state and never mutate.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Cheap connectivity check for the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // =========================================================================
    // Catalog and reference-data reads
    // =========================================================================

    /// Fetch a single item.
    async fn item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Fetch all items. Analytics reads the whole catalog in one batched
    /// call and joins lookup labels in memory.
    async fn items(&self) -> Result<Vec<Item>, RepositoryError>;

    /// Fetch a single warehouse.
    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, RepositoryError>;

    /// Fetch all warehouses.
    async fn warehouses(&self) -> Result<Vec<Warehouse>, RepositoryError>;

    /// Fetch all categories.
    async fn categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Fetch all brands.
    async fn brands(&self) -> Result<Vec<Brand>, RepositoryError>;

    /// Fetch all measurement units.
    async fn units(&self) -> Result<Vec<Unit>, RepositoryError>;

    // =========================================================================
    // Ledger writes (each internally atomic)
    // =========================================================================

    /// Insert a stock-receipt ledger row and increment the item's quantity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the item does not exist; `Database` on storage failure.
    async fn apply_add_stock(
        &self,
        input: &NewAddStock,
    ) -> Result<AddStockAdjustment, RepositoryError>;

    /// Insert a transfer ledger row and decrement the item's quantity.
    ///
    /// # Errors
    ///
    /// `NotFound` if the item does not exist; `InsufficientStock` if the
    /// decrement would drive the quantity negative.
    async fn apply_transfer_stock(
        &self,
        input: &NewTransferStock,
    ) -> Result<TransferStockAdjustment, RepositoryError>;

    /// Create a sale aggregate: header, one line row per input line (in
    /// order), and one quantity decrement per line. All lines commit
    /// together or none do.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unresolvable line item; `InsufficientStock` if any
    /// line would drive its item's quantity negative (the entire sale is
    /// rejected).
    async fn create_sale(
        &self,
        reference_number: &str,
        lines: &[SaleLine],
        total_amount: Decimal,
    ) -> Result<SaleWithItems, RepositoryError>;

    /// Delete a sale aggregate, restoring every line's quantity first. The
    /// post-delete inventory state is indistinguishable from the sale never
    /// having occurred.
    ///
    /// Returns the deleted aggregate.
    ///
    /// # Errors
    ///
    /// `NotFound` if the sale does not exist.
    async fn delete_sale(&self, id: SaleId) -> Result<SaleWithItems, RepositoryError>;

    // =========================================================================
    // Ledger reads
    // =========================================================================

    /// Fetch a sale aggregate by ID.
    async fn sale(&self, id: SaleId) -> Result<Option<SaleWithItems>, RepositoryError>;

    /// Stock-receipt ledger rows created at or after `since`.
    async fn add_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AddStockAdjustment>, RepositoryError>;

    /// Transfer ledger rows created at or after `since`.
    async fn transfer_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransferStockAdjustment>, RepositoryError>;

    /// Sale aggregates created at or after `since`, line items included.
    async fn sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SaleWithItems>, RepositoryError>;
}
