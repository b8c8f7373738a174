//! Catalog item and reference-data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{BrandId, CategoryId, ItemId, UnitId, WarehouseId};

/// A catalog item with its global on-hand quantity.
///
/// `quantity` is the single contended mutable field of the system. It is
/// mutated exclusively through the adjustment engine and the sale processor,
/// never directly; every change is paired with exactly one ledger row in the
/// same atomic unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Display title.
    pub title: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Current global on-hand quantity. Invariant: never negative.
    pub quantity: i32,
    /// Threshold at or below which the item is flagged low-stock.
    pub reorder_point: Option<i32>,
    /// Purchase cost per unit.
    pub buying_price: Decimal,
    /// Sale price per unit.
    pub selling_price: Decimal,
    /// Listed unit price.
    pub unit_price: Decimal,
    /// Tax rate in percent applied to sale revenue for this item.
    pub tax_rate: Option<Decimal>,
    /// Category reference (CRUD owned by a collaborator).
    pub category_id: Option<CategoryId>,
    /// Brand reference.
    pub brand_id: Option<BrandId>,
    /// Measurement unit reference.
    pub unit_id: Option<UnitId>,
    /// Home warehouse reference.
    pub warehouse_id: Option<WarehouseId>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A warehouse referenced by ledger events.
///
/// Deletion is blocked by the owning collaborator while adjustment rows
/// reference it, so existence checks here never race with removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: WarehouseId,
    pub title: String,
    pub location: String,
    pub warehouse_type: String,
}

/// An item category (read-only lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
}

/// An item brand (read-only lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub title: String,
}

/// A measurement unit (read-only lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub title: String,
}
