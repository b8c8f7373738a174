//! `PostgreSQL` implementation of the inventory store.
//!
//! Every mutation runs inside one transaction. Quantity changes are
//! expressed as conditional `UPDATE ... SET quantity = quantity ± $n`
//! statements so the row lock taken by the update serializes concurrent
//! operations on the same item; the `quantity >= $n` predicate (plus the
//! `CHECK (quantity >= 0)` constraint) upholds the non-negative invariant
//! without an application-level read-then-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use stockroom_core::{
    AddStockAdjustmentId, BrandId, CategoryId, ItemId, SaleId, SaleItemId,
    TransferStockAdjustmentId, UnitId, WarehouseId,
};

use super::store::InventoryStore;
use super::RepositoryError;
use crate::models::{
    AddStockAdjustment, Brand, Category, Item, NewAddStock, NewTransferStock, Sale, SaleItem,
    SaleLine, SaleWithItems, TransferStockAdjustment, Unit, Warehouse,
};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: ItemId,
    title: String,
    sku: String,
    quantity: i32,
    reorder_point: Option<i32>,
    buying_price: Decimal,
    selling_price: Decimal,
    unit_price: Decimal,
    tax_rate: Option<Decimal>,
    category_id: Option<CategoryId>,
    brand_id: Option<BrandId>,
    unit_id: Option<UnitId>,
    warehouse_id: Option<WarehouseId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            sku: row.sku,
            quantity: row.quantity,
            reorder_point: row.reorder_point,
            buying_price: row.buying_price,
            selling_price: row.selling_price,
            unit_price: row.unit_price,
            tax_rate: row.tax_rate,
            category_id: row.category_id,
            brand_id: row.brand_id,
            unit_id: row.unit_id,
            warehouse_id: row.warehouse_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for stock-receipt ledger rows.
#[derive(Debug, sqlx::FromRow)]
struct AddStockRow {
    id: AddStockAdjustmentId,
    item_id: ItemId,
    warehouse_id: WarehouseId,
    quantity: i32,
    reference_number: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AddStockRow> for AddStockAdjustment {
    fn from(row: AddStockRow) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            warehouse_id: row.warehouse_id,
            quantity: row.quantity,
            reference_number: row.reference_number,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for transfer ledger rows.
#[derive(Debug, sqlx::FromRow)]
struct TransferStockRow {
    id: TransferStockAdjustmentId,
    item_id: ItemId,
    giving_warehouse_id: WarehouseId,
    receiving_warehouse_id: WarehouseId,
    quantity: i32,
    reference_number: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TransferStockRow> for TransferStockAdjustment {
    fn from(row: TransferStockRow) -> Self {
        Self {
            id: row.id,
            item_id: row.item_id,
            giving_warehouse_id: row.giving_warehouse_id,
            receiving_warehouse_id: row.receiving_warehouse_id,
            quantity: row.quantity,
            reference_number: row.reference_number,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for sale headers.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: SaleId,
    reference_number: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: row.id,
            reference_number: row.reference_number,
            total_amount: row.total_amount,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for sale lines.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: SaleItemId,
    sale_id: SaleId,
    item_id: ItemId,
    quantity_sold: i32,
    price_per_item: Decimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        Self {
            id: row.id,
            sale_id: row.sale_id,
            item_id: row.item_id,
            quantity_sold: row.quantity_sold,
            price_per_item: row.price_per_item,
        }
    }
}

/// Internal row type for warehouse queries.
#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: WarehouseId,
    title: String,
    location: String,
    warehouse_type: String,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            location: row.location,
            warehouse_type: row.warehouse_type,
        }
    }
}

/// Internal row type for category lookups.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    title: String,
}

/// Internal row type for brand lookups.
#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: BrandId,
    title: String,
}

/// Internal row type for unit lookups.
#[derive(Debug, sqlx::FromRow)]
struct UnitRow {
    id: UnitId,
    title: String,
}

const ITEM_COLUMNS: &str = "id, title, sku, quantity, reorder_point, buying_price, \
     selling_price, unit_price, tax_rate, category_id, brand_id, unit_id, warehouse_id, \
     created_at, updated_at";

const ADD_STOCK_COLUMNS: &str =
    "id, item_id, warehouse_id, quantity, reference_number, notes, created_at";

const TRANSFER_COLUMNS: &str = "id, item_id, giving_warehouse_id, receiving_warehouse_id, \
     quantity, reference_number, notes, created_at";

// =============================================================================
// Store
// =============================================================================

/// `PostgreSQL`-backed inventory store.
#[derive(Debug, Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    /// Create a new store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Decrement an item's quantity inside `tx`, upholding the non-negative
    /// invariant.
    ///
    /// Returns `NotFound` when the item row does not exist and
    /// `InsufficientStock` (with the current on-hand count) when the
    /// decrement would go negative.
    async fn decrement_quantity(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        item_id: ItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let updated = sqlx::query(
            "UPDATE item SET quantity = quantity - $1, updated_at = NOW() \
             WHERE id = $2 AND quantity >= $1",
        )
        .bind(quantity)
        .bind(item_id)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(());
        }

        // Distinguish a missing item from an undersupplied one.
        let available: Option<(i32,)> = sqlx::query_as("SELECT quantity FROM item WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&mut **tx)
            .await?;

        match available {
            Some((available,)) => Err(RepositoryError::InsufficientStock {
                item_id,
                requested: quantity,
                available,
            }),
            None => Err(RepositoryError::NotFound {
                entity: "item",
                id: item_id.as_i32(),
            }),
        }
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn items(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM item ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, RepositoryError> {
        let row = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, title, location, warehouse_type FROM warehouse WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn warehouses(&self) -> Result<Vec<Warehouse>, RepositoryError> {
        let rows = sqlx::query_as::<_, WarehouseRow>(
            "SELECT id, title, location, warehouse_type FROM warehouse ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, title FROM category ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.id,
                title: row.title,
            })
            .collect())
    }

    async fn brands(&self) -> Result<Vec<Brand>, RepositoryError> {
        let rows = sqlx::query_as::<_, BrandRow>("SELECT id, title FROM brand ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Brand {
                id: row.id,
                title: row.title,
            })
            .collect())
    }

    async fn units(&self) -> Result<Vec<Unit>, RepositoryError> {
        let rows = sqlx::query_as::<_, UnitRow>("SELECT id, title FROM unit ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Unit {
                id: row.id,
                title: row.title,
            })
            .collect())
    }

    async fn apply_add_stock(
        &self,
        input: &NewAddStock,
    ) -> Result<AddStockAdjustment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE item SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(input.quantity.get())
        .bind(input.item_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound {
                entity: "item",
                id: input.item_id.as_i32(),
            });
        }

        let row = sqlx::query_as::<_, AddStockRow>(&format!(
            "INSERT INTO add_stock_adjustment \
                 (item_id, warehouse_id, quantity, reference_number, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ADD_STOCK_COLUMNS}"
        ))
        .bind(input.item_id)
        .bind(input.warehouse_id)
        .bind(input.quantity.get())
        .bind(input.reference_number.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn apply_transfer_stock(
        &self,
        input: &NewTransferStock,
    ) -> Result<TransferStockAdjustment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        Self::decrement_quantity(&mut tx, input.item_id, input.quantity.get()).await?;

        let row = sqlx::query_as::<_, TransferStockRow>(&format!(
            "INSERT INTO transfer_stock_adjustment \
                 (item_id, giving_warehouse_id, receiving_warehouse_id, quantity, \
                  reference_number, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TRANSFER_COLUMNS}"
        ))
        .bind(input.item_id)
        .bind(input.giving_warehouse_id)
        .bind(input.receiving_warehouse_id)
        .bind(input.quantity.get())
        .bind(input.reference_number.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn create_sale(
        &self,
        reference_number: &str,
        lines: &[SaleLine],
        total_amount: Decimal,
    ) -> Result<SaleWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Decrement every line first; any failure rolls the whole sale back.
        for line in lines {
            Self::decrement_quantity(&mut tx, line.item_id, line.quantity.get()).await?;
        }

        let sale_row = sqlx::query_as::<_, SaleRow>(
            "INSERT INTO sale (reference_number, total_amount) \
             VALUES ($1, $2) \
             RETURNING id, reference_number, total_amount, created_at",
        )
        .bind(reference_number)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item_row = sqlx::query_as::<_, SaleItemRow>(
                "INSERT INTO sale_item (sale_id, item_id, quantity_sold, price_per_item) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, sale_id, item_id, quantity_sold, price_per_item",
            )
            .bind(sale_row.id)
            .bind(line.item_id)
            .bind(line.quantity.get())
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;

            items.push(item_row.into());
        }

        tx.commit().await?;

        Ok(SaleWithItems {
            sale: sale_row.into(),
            items,
        })
    }

    async fn delete_sale(&self, id: SaleId) -> Result<SaleWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the header so a concurrent delete of the same sale cannot
        // restore quantities twice.
        let sale_row = sqlx::query_as::<_, SaleRow>(
            "SELECT id, reference_number, total_amount, created_at \
             FROM sale WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "sale",
            id: id.as_i32(),
        })?;

        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT id, sale_id, item_id, quantity_sold, price_per_item \
             FROM sale_item WHERE sale_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for line in &item_rows {
            sqlx::query(
                "UPDATE item SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(line.quantity_sold)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM sale_item WHERE sale_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sale WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(SaleWithItems {
            sale: sale_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        })
    }

    async fn sale(&self, id: SaleId) -> Result<Option<SaleWithItems>, RepositoryError> {
        let Some(sale_row) = sqlx::query_as::<_, SaleRow>(
            "SELECT id, reference_number, total_amount, created_at FROM sale WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT id, sale_id, item_id, quantity_sold, price_per_item \
             FROM sale_item WHERE sale_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SaleWithItems {
            sale: sale_row.into(),
            items: item_rows.into_iter().map(Into::into).collect(),
        }))
    }

    async fn add_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AddStockAdjustment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddStockRow>(&format!(
            "SELECT {ADD_STOCK_COLUMNS} FROM add_stock_adjustment \
             WHERE created_at >= $1 ORDER BY created_at"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn transfer_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransferStockAdjustment>, RepositoryError> {
        let rows = sqlx::query_as::<_, TransferStockRow>(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfer_stock_adjustment \
             WHERE created_at >= $1 ORDER BY created_at"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SaleWithItems>, RepositoryError> {
        let sale_rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, reference_number, total_amount, created_at \
             FROM sale WHERE created_at >= $1 ORDER BY created_at",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        if sale_rows.is_empty() {
            return Ok(Vec::new());
        }

        // One batched fetch for all line items instead of a query per sale.
        let sale_ids: Vec<i32> = sale_rows.iter().map(|row| row.id.as_i32()).collect();
        let item_rows = sqlx::query_as::<_, SaleItemRow>(
            "SELECT id, sale_id, item_id, quantity_sold, price_per_item \
             FROM sale_item WHERE sale_id = ANY($1) ORDER BY id",
        )
        .bind(&sale_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut sales: Vec<SaleWithItems> = sale_rows
            .into_iter()
            .map(|row| SaleWithItems {
                sale: row.into(),
                items: Vec::new(),
            })
            .collect();

        for item_row in item_rows {
            if let Some(sale) = sales.iter_mut().find(|s| s.sale.id == item_row.sale_id) {
                sale.items.push(item_row.into());
            }
        }

        Ok(sales)
    }
}
