//! The analytics aggregator.
//!
//! Read-only views over committed ledger and catalog state. Each aggregate
//! is computed from whole-table batched reads joined in memory; lookup
//! labels that fail to resolve render as `"Unknown"` instead of failing the
//! aggregate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use stockroom_core::{BrandId, CategoryId, ItemId, UnitId, WarehouseId};

use crate::db::InventoryStore;
use crate::error::AppError;
use crate::models::{
    BusinessReport, DailyMovement, InventoryValuation, Item, ItemMovement, LowStockItem,
    LowStockReport, LowStockSeverity, StockMovement, TopSellingItem, ValuationGroup,
    WarehouseMovement,
};

const UNKNOWN_LABEL: &str = "Unknown";
const REPORT_WINDOW_DAYS: u32 = 30;
const GROWTH_PERIOD_DAYS: i64 = 7;
const TOP_LIST_LEN: usize = 10;

/// Lookup-table labels joined in memory.
struct LookupLabels {
    categories: HashMap<CategoryId, String>,
    brands: HashMap<BrandId, String>,
    units: HashMap<UnitId, String>,
    warehouses: HashMap<WarehouseId, String>,
}

impl LookupLabels {
    async fn load(store: &dyn InventoryStore) -> Result<Self, AppError> {
        Ok(Self {
            categories: store
                .categories()
                .await?
                .into_iter()
                .map(|c| (c.id, c.title))
                .collect(),
            brands: store
                .brands()
                .await?
                .into_iter()
                .map(|b| (b.id, b.title))
                .collect(),
            units: store
                .units()
                .await?
                .into_iter()
                .map(|u| (u.id, u.title))
                .collect(),
            warehouses: store
                .warehouses()
                .await?
                .into_iter()
                .map(|w| (w.id, w.title))
                .collect(),
        })
    }

    fn category(&self, id: Option<CategoryId>) -> String {
        id.and_then(|id| self.categories.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_owned())
    }

    fn brand(&self, id: Option<BrandId>) -> String {
        id.and_then(|id| self.brands.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_owned())
    }

    fn unit(&self, id: Option<UnitId>) -> String {
        id.and_then(|id| self.units.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_owned())
    }

    fn warehouse(&self, id: Option<WarehouseId>) -> String {
        id.and_then(|id| self.warehouses.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_owned())
    }
}

/// Computes read-only inventory aggregates.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn InventoryStore>,
    movement_window_days: u32,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, movement_window_days: u32) -> Self {
        Self {
            store,
            movement_window_days,
        }
    }

    /// Items at or below their reorder point, partitioned by severity and
    /// ordered ascending by quantity. Items without a reorder point are
    /// never flagged.
    ///
    /// # Errors
    ///
    /// `Database` when the catalog read fails.
    pub async fn low_stock(&self) -> Result<LowStockReport, AppError> {
        let items = self.store.items().await?;
        let labels = LookupLabels::load(self.store.as_ref()).await?;

        let mut flagged = low_stock_items(&items, &labels);
        flagged.sort_by_key(|entry| entry.quantity);

        let (critical, warning): (Vec<_>, Vec<_>) = flagged
            .into_iter()
            .partition(|entry| entry.severity == LowStockSeverity::Critical);

        Ok(LowStockReport { warning, critical })
    }

    /// Valuation of current committed stock, with category and warehouse
    /// breakdowns.
    ///
    /// # Errors
    ///
    /// `Database` when the catalog read fails.
    pub async fn inventory_valuation(&self) -> Result<InventoryValuation, AppError> {
        let items = self.store.items().await?;
        let labels = LookupLabels::load(self.store.as_ref()).await?;

        let mut total_value = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        let mut by_category: BTreeMap<String, ValuationGroup> = BTreeMap::new();
        let mut by_warehouse: BTreeMap<String, ValuationGroup> = BTreeMap::new();

        for item in &items {
            let quantity = Decimal::from(item.quantity);
            let value = quantity * item.selling_price;
            let cost = quantity * item.buying_price;
            total_value += value;
            total_cost += cost;

            accumulate_group(&mut by_category, labels.category(item.category_id), value, cost);
            accumulate_group(
                &mut by_warehouse,
                labels.warehouse(item.warehouse_id),
                value,
                cost,
            );
        }

        Ok(InventoryValuation {
            total_inventory_value: total_value,
            total_cost_value: total_cost,
            profit_margin: profit_margin(total_value, total_cost),
            by_category: by_category.into_values().collect(),
            by_warehouse: by_warehouse.into_values().collect(),
        })
    }

    /// Add/transfer movement over a trailing window, summed by day, by
    /// item, and by warehouse. Receipts count toward the receiving
    /// warehouse; transfers toward the giving warehouse.
    ///
    /// # Errors
    ///
    /// `Database` when a ledger read fails.
    pub async fn stock_movement(&self, days: Option<u32>) -> Result<StockMovement, AppError> {
        let window_days = days.unwrap_or(self.movement_window_days).max(1);
        let now = Utc::now();
        let since = now - Duration::days(i64::from(window_days));

        let adds = self.store.add_stock_adjustments_since(since).await?;
        let transfers = self.store.transfer_stock_adjustments_since(since).await?;
        let items = self.store.items().await?;
        let labels = LookupLabels::load(self.store.as_ref()).await?;

        let titles: HashMap<ItemId, &str> = items
            .iter()
            .map(|item| (item.id, item.title.as_str()))
            .collect();

        let mut total_added = 0_i64;
        let mut total_transferred = 0_i64;
        let mut by_day: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        let mut by_item: BTreeMap<ItemId, (i64, i64)> = BTreeMap::new();
        let mut by_warehouse: BTreeMap<String, (i64, i64)> = BTreeMap::new();

        // Totals moved inside the two most recent 7-day slices, for growth.
        let recent_cutoff = now - Duration::days(GROWTH_PERIOD_DAYS);
        let previous_cutoff = now - Duration::days(2 * GROWTH_PERIOD_DAYS);
        let mut recent_moved = 0_i64;
        let mut previous_moved = 0_i64;

        for add in &adds {
            let quantity = i64::from(add.quantity);
            total_added += quantity;
            by_day.entry(add.created_at.date_naive()).or_default().0 += quantity;
            by_item.entry(add.item_id).or_default().0 += quantity;
            by_warehouse
                .entry(labels.warehouse(Some(add.warehouse_id)))
                .or_default()
                .0 += quantity;
            if add.created_at >= recent_cutoff {
                recent_moved += quantity;
            } else if add.created_at >= previous_cutoff {
                previous_moved += quantity;
            }
        }

        for transfer in &transfers {
            let quantity = i64::from(transfer.quantity);
            total_transferred += quantity;
            by_day
                .entry(transfer.created_at.date_naive())
                .or_default()
                .1 += quantity;
            by_item.entry(transfer.item_id).or_default().1 += quantity;
            by_warehouse
                .entry(labels.warehouse(Some(transfer.giving_warehouse_id)))
                .or_default()
                .1 += quantity;
            if transfer.created_at >= recent_cutoff {
                recent_moved += quantity;
            } else if transfer.created_at >= previous_cutoff {
                previous_moved += quantity;
            }
        }

        Ok(StockMovement {
            window_days,
            total_added,
            total_transferred,
            growth_rate: growth_rate(recent_moved, previous_moved),
            by_day: by_day
                .into_iter()
                .map(|(date, (added, transferred))| DailyMovement {
                    date,
                    added,
                    transferred,
                })
                .collect(),
            by_item: by_item
                .into_iter()
                .map(|(item_id, (added, transferred))| ItemMovement {
                    item_id,
                    title: titles
                        .get(&item_id)
                        .map_or_else(|| UNKNOWN_LABEL.to_owned(), ToString::to_string),
                    added,
                    transferred,
                })
                .collect(),
            by_warehouse: by_warehouse
                .into_iter()
                .map(|(warehouse, (added, transferred))| WarehouseMovement {
                    warehouse,
                    added,
                    transferred,
                })
                .collect(),
        })
    }

    /// Combined trailing-30-day business report over sales and inventory.
    ///
    /// Profit uses catalog prices per line (`(selling − buying) ×
    /// quantity_sold`); tax applies each item's `tax_rate` percentage to its
    /// line revenue, treating a missing rate as 0.
    ///
    /// # Errors
    ///
    /// `Database` when a ledger or catalog read fails.
    pub async fn report(&self) -> Result<BusinessReport, AppError> {
        let since = Utc::now() - Duration::days(i64::from(REPORT_WINDOW_DAYS));
        let sales = self.store.sales_since(since).await?;
        let items = self.store.items().await?;
        let labels = LookupLabels::load(self.store.as_ref()).await?;

        let catalog: HashMap<ItemId, &Item> = items.iter().map(|item| (item.id, item)).collect();

        let mut total_sales = Decimal::ZERO;
        let mut total_sales_quantity = 0_i64;
        let mut total_profit = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        let mut sold: BTreeMap<ItemId, (i64, Decimal)> = BTreeMap::new();

        for sale in &sales {
            total_sales += sale.sale.total_amount;
            for line in &sale.items {
                let quantity = Decimal::from(line.quantity_sold);
                let revenue = quantity * line.price_per_item;
                total_sales_quantity += i64::from(line.quantity_sold);

                if let Some(item) = catalog.get(&line.item_id) {
                    total_profit += (item.selling_price - item.buying_price) * quantity;
                    if let Some(tax_rate) = item.tax_rate {
                        total_tax += revenue * tax_rate / Decimal::ONE_HUNDRED;
                    }
                }

                let entry = sold.entry(line.item_id).or_insert((0, Decimal::ZERO));
                entry.0 += i64::from(line.quantity_sold);
                entry.1 += revenue;
            }
        }

        let mut top_selling: Vec<TopSellingItem> = sold
            .into_iter()
            .map(|(item_id, (quantity_sold, revenue))| TopSellingItem {
                item_id,
                title: catalog.get(&item_id).map_or_else(
                    || UNKNOWN_LABEL.to_owned(),
                    |item| item.title.clone(),
                ),
                quantity_sold,
                revenue,
            })
            .collect();
        top_selling.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
        top_selling.truncate(TOP_LIST_LEN);

        let mut low_stock = low_stock_items(&items, &labels);
        low_stock.sort_by_key(|entry| entry.quantity);
        low_stock.truncate(TOP_LIST_LEN);

        Ok(BusinessReport {
            period_days: REPORT_WINDOW_DAYS,
            total_sales,
            total_sales_quantity,
            total_profit,
            total_tax,
            top_selling_items: top_selling,
            low_stock_items: low_stock,
        })
    }
}

/// Flag every item at or below its reorder point. Unsorted.
fn low_stock_items(items: &[Item], labels: &LookupLabels) -> Vec<LowStockItem> {
    items
        .iter()
        .filter_map(|item| {
            let reorder_point = item.reorder_point?;
            if item.quantity > reorder_point {
                return None;
            }
            let severity = if item.quantity == 0 {
                LowStockSeverity::Critical
            } else {
                LowStockSeverity::Warning
            };
            Some(LowStockItem {
                item_id: item.id,
                title: item.title.clone(),
                sku: item.sku.clone(),
                quantity: item.quantity,
                reorder_point,
                category: labels.category(item.category_id),
                brand: labels.brand(item.brand_id),
                unit: labels.unit(item.unit_id),
                warehouse: labels.warehouse(item.warehouse_id),
                severity,
            })
        })
        .collect()
}

fn accumulate_group(
    groups: &mut BTreeMap<String, ValuationGroup>,
    label: String,
    value: Decimal,
    cost: Decimal,
) {
    let group = groups.entry(label.clone()).or_insert_with(|| ValuationGroup {
        label,
        item_count: 0,
        total_value: Decimal::ZERO,
        total_cost: Decimal::ZERO,
    });
    group.item_count += 1;
    group.total_value += value;
    group.total_cost += cost;
}

/// `(value − cost) / value × 100`, or exactly 0 when value is 0.
fn profit_margin(value: Decimal, cost: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        (value - cost) / value * Decimal::ONE_HUNDRED
    }
}

/// `(recent − previous) / previous × 100`, or exactly 0 when the previous
/// period saw no movement.
#[allow(clippy::cast_precision_loss)]
fn growth_rate(recent: i64, previous: i64) -> f64 {
    if previous == 0 {
        0.0
    } else {
        (recent - previous) as f64 / previous as f64 * 100.0
    }
}
