//! Sale aggregate models.
//!
//! A `Sale` owns an ordered collection of `SaleItem` lines. The aggregate is
//! immutable once committed except for whole-aggregate deletion, which fully
//! reverses the quantity effect of every line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, SaleId, SaleItemId, StockQuantity};

/// Sale aggregate header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    /// System-generated reference of the form `SALE-<8 uppercase base36>`.
    pub reference_number: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// One line of a committed sale. On-hand delta at creation: `-quantity_sold`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: SaleItemId,
    pub sale_id: SaleId,
    pub item_id: ItemId,
    pub quantity_sold: i32,
    pub price_per_item: Decimal,
}

/// A sale header together with its ordered line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// A validated sale line ready for the storage layer.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub item_id: ItemId,
    pub quantity: StockQuantity,
    pub price: Decimal,
}

impl SaleWithItems {
    /// Sum of `quantity_sold × price_per_item` across all lines.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.items
            .iter()
            .map(|line| Decimal::from(line.quantity_sold) * line.price_per_item)
            .sum()
    }
}
