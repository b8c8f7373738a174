//! The sale transaction processor.

use std::sync::Arc;

use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;

use stockroom_core::{ItemId, SaleId, StockQuantity};

use crate::db::InventoryStore;
use crate::error::AppError;
use crate::models::{SaleLine, SaleWithItems};
use crate::services::activity::{ActivityAction, ActivityEvent, ActivityLog};

/// One line of a sale request.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleLineRequest {
    /// Item being sold.
    pub id: ItemId,
    pub quantity: i32,
    pub price: Decimal,
}

/// Request body for `POST /sales`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub items: Vec<SaleLineRequest>,
    pub total_amount: Decimal,
}

const SALE_REFERENCE_LEN: usize = 8;
const SALE_REFERENCE_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a sale reference of the form `SALE-<8 uppercase base36 chars>`.
fn generate_sale_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SALE_REFERENCE_LEN)
        .map(|_| {
            let index = rng.random_range(0..SALE_REFERENCE_CHARSET.len());
            char::from(SALE_REFERENCE_CHARSET[index])
        })
        .collect();
    format!("SALE-{suffix}")
}

/// Creates and reverses sale aggregates.
#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn InventoryStore>,
    activity: ActivityLog,
}

impl SaleService {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, activity: ActivityLog) -> Self {
        Self { store, activity }
    }

    /// Create a sale: header, one line per input line (in order), and one
    /// quantity decrement per line, all in one atomic unit. The declared
    /// total amount is reconciled against the line total instead of being
    /// trusted.
    ///
    /// # Errors
    ///
    /// `Validation` for empty lines, non-positive quantities, negative
    /// prices, or a total that does not reconcile; `NotFound` for an
    /// unresolvable line item; `InsufficientStock` if any line would drive
    /// its item's quantity negative; the entire sale is rejected, not just
    /// that line.
    pub async fn create_sale(
        &self,
        request: CreateSaleRequest,
    ) -> Result<SaleWithItems, AppError> {
        if request.items.is_empty() {
            return Err(AppError::Validation {
                field: "items",
                message: "a sale requires at least one line".to_owned(),
            });
        }

        let mut lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let quantity =
                StockQuantity::new(line.quantity).map_err(|err| AppError::Validation {
                    field: "items.quantity",
                    message: format!("item {}: {err}", line.id),
                })?;
            if line.price.is_sign_negative() {
                return Err(AppError::Validation {
                    field: "items.price",
                    message: format!("item {}: price cannot be negative", line.id),
                });
            }
            lines.push(SaleLine {
                item_id: line.id,
                quantity,
                price: line.price,
            });
        }

        let line_total: Decimal = lines
            .iter()
            .map(|line| Decimal::from(line.quantity.get()) * line.price)
            .sum();
        if line_total != request.total_amount {
            return Err(AppError::Validation {
                field: "totalAmount",
                message: format!(
                    "declared total {} does not reconcile with line total {line_total}",
                    request.total_amount
                ),
            });
        }

        let reference_number = generate_sale_reference();
        let sale = self
            .store
            .create_sale(&reference_number, &lines, line_total)
            .await?;

        let quantity_sold: i32 = sale.items.iter().map(|line| line.quantity_sold).sum();
        tracing::info!(
            sale_id = %sale.sale.id,
            reference = %sale.sale.reference_number,
            lines = sale.items.len(),
            quantity_sold,
            total = %sale.sale.total_amount,
            "sale created"
        );
        self.activity.record(
            ActivityEvent::new(ActivityAction::SaleCreated, "sale", sale.sale.id.as_i32())
                .with_reference(&sale.sale.reference_number)
                .with_quantity(quantity_sold),
        );

        Ok(sale)
    }

    /// Delete a sale, restoring every line's quantity. Afterwards the
    /// inventory state is indistinguishable from the sale never having
    /// occurred.
    ///
    /// # Errors
    ///
    /// `NotFound` if the sale does not exist.
    pub async fn delete_sale(&self, id: SaleId) -> Result<SaleWithItems, AppError> {
        let sale = self.store.delete_sale(id).await?;

        let quantity_restored: i32 = sale.items.iter().map(|line| line.quantity_sold).sum();
        tracing::info!(
            sale_id = %sale.sale.id,
            reference = %sale.sale.reference_number,
            quantity_restored,
            "sale deleted"
        );
        self.activity.record(
            ActivityEvent::new(ActivityAction::SaleDeleted, "sale", sale.sale.id.as_i32())
                .with_reference(&sale.sale.reference_number)
                .with_quantity(quantity_restored),
        );

        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_reference_format() {
        let reference = generate_sale_reference();
        assert_eq!(reference.len(), "SALE-".len() + SALE_REFERENCE_LEN);
        assert!(reference.starts_with("SALE-"));

        let suffix = &reference["SALE-".len()..];
        assert!(
            suffix
                .bytes()
                .all(|byte| SALE_REFERENCE_CHARSET.contains(&byte)),
            "unexpected character in {reference}"
        );
    }

    #[test]
    fn test_sale_references_vary() {
        let first = generate_sale_reference();
        let second = generate_sale_reference();
        // 36^8 possibilities; a collision here means the generator is broken.
        assert_ne!(first, second);
    }
}
