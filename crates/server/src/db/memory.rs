//! In-memory implementation of the inventory store.
//!
//! Intended for tests and local development. A single mutex guards the whole
//! state, so each operation gets the same effective exclusivity over the
//! target item that the `PostgreSQL` implementation gets from its
//! transaction, and the non-negative quantity invariant is checked before
//! any mutation is applied.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use stockroom_core::{BrandId, CategoryId, ItemId, SaleId, UnitId, WarehouseId};

use super::store::InventoryStore;
use super::RepositoryError;
use crate::models::{
    AddStockAdjustment, Brand, Category, Item, NewAddStock, NewTransferStock, Sale, SaleItem,
    SaleLine, SaleWithItems, TransferStockAdjustment, Unit, Warehouse,
};

/// Seed data for one catalog item.
#[derive(Debug, Clone)]
pub struct ItemSeed {
    pub title: String,
    pub sku: String,
    pub quantity: i32,
    pub reorder_point: Option<i32>,
    pub buying_price: Decimal,
    pub selling_price: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Option<Decimal>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub unit_id: Option<UnitId>,
    pub warehouse_id: Option<WarehouseId>,
}

impl Default for ItemSeed {
    fn default() -> Self {
        Self {
            title: "Unnamed item".to_owned(),
            sku: "SKU-0000".to_owned(),
            quantity: 0,
            reorder_point: None,
            buying_price: Decimal::ZERO,
            selling_price: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            tax_rate: None,
            category_id: None,
            brand_id: None,
            unit_id: None,
            warehouse_id: None,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<ItemId, Item>,
    warehouses: BTreeMap<WarehouseId, Warehouse>,
    categories: BTreeMap<CategoryId, Category>,
    brands: BTreeMap<BrandId, Brand>,
    units: BTreeMap<UnitId, Unit>,
    add_adjustments: Vec<AddStockAdjustment>,
    transfer_adjustments: Vec<TransferStockAdjustment>,
    sales: Vec<SaleWithItems>,
    next_id: i32,
}

impl MemoryState {
    fn alloc_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-guarded in-memory inventory store.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryInventoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a warehouse and return it.
    pub async fn seed_warehouse(&self, title: &str, location: &str, warehouse_type: &str) -> Warehouse {
        let mut state = self.state.lock().await;
        let warehouse = Warehouse {
            id: WarehouseId::new(state.alloc_id()),
            title: title.to_owned(),
            location: location.to_owned(),
            warehouse_type: warehouse_type.to_owned(),
        };
        state.warehouses.insert(warehouse.id, warehouse.clone());
        warehouse
    }

    /// Seed a category and return it.
    pub async fn seed_category(&self, title: &str) -> Category {
        let mut state = self.state.lock().await;
        let category = Category {
            id: CategoryId::new(state.alloc_id()),
            title: title.to_owned(),
        };
        state.categories.insert(category.id, category.clone());
        category
    }

    /// Seed a brand and return it.
    pub async fn seed_brand(&self, title: &str) -> Brand {
        let mut state = self.state.lock().await;
        let brand = Brand {
            id: BrandId::new(state.alloc_id()),
            title: title.to_owned(),
        };
        state.brands.insert(brand.id, brand.clone());
        brand
    }

    /// Seed a measurement unit and return it.
    pub async fn seed_unit(&self, title: &str) -> Unit {
        let mut state = self.state.lock().await;
        let unit = Unit {
            id: UnitId::new(state.alloc_id()),
            title: title.to_owned(),
        };
        state.units.insert(unit.id, unit.clone());
        unit
    }

    /// Seed a catalog item and return it.
    pub async fn seed_item(&self, seed: ItemSeed) -> Item {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let item = Item {
            id: ItemId::new(state.alloc_id()),
            title: seed.title,
            sku: seed.sku,
            quantity: seed.quantity,
            reorder_point: seed.reorder_point,
            buying_price: seed.buying_price,
            selling_price: seed.selling_price,
            unit_price: seed.unit_price,
            tax_rate: seed.tax_rate,
            category_id: seed.category_id,
            brand_id: seed.brand_id,
            unit_id: seed.unit_id,
            warehouse_id: seed.warehouse_id,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        item
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.items.get(&id).cloned())
    }

    async fn items(&self) -> Result<Vec<Item>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.items.values().cloned().collect())
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.warehouses.get(&id).cloned())
    }

    async fn warehouses(&self) -> Result<Vec<Warehouse>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.warehouses.values().cloned().collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.categories.values().cloned().collect())
    }

    async fn brands(&self) -> Result<Vec<Brand>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.brands.values().cloned().collect())
    }

    async fn units(&self) -> Result<Vec<Unit>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.units.values().cloned().collect())
    }

    async fn apply_add_stock(
        &self,
        input: &NewAddStock,
    ) -> Result<AddStockAdjustment, RepositoryError> {
        let mut state = self.state.lock().await;

        if !state.items.contains_key(&input.item_id) {
            return Err(RepositoryError::NotFound {
                entity: "item",
                id: input.item_id.as_i32(),
            });
        }

        let id = state.alloc_id();
        let adjustment = AddStockAdjustment {
            id: id.into(),
            item_id: input.item_id,
            warehouse_id: input.warehouse_id,
            quantity: input.quantity.get(),
            reference_number: input.reference_number.as_str().to_owned(),
            notes: input.notes.clone(),
            created_at: Utc::now(),
        };

        if let Some(item) = state.items.get_mut(&input.item_id) {
            item.quantity += input.quantity.get();
            item.updated_at = adjustment.created_at;
        }
        state.add_adjustments.push(adjustment.clone());

        Ok(adjustment)
    }

    async fn apply_transfer_stock(
        &self,
        input: &NewTransferStock,
    ) -> Result<TransferStockAdjustment, RepositoryError> {
        let mut state = self.state.lock().await;

        let available = state
            .items
            .get(&input.item_id)
            .map(|item| item.quantity)
            .ok_or(RepositoryError::NotFound {
                entity: "item",
                id: input.item_id.as_i32(),
            })?;

        if available < input.quantity.get() {
            return Err(RepositoryError::InsufficientStock {
                item_id: input.item_id,
                requested: input.quantity.get(),
                available,
            });
        }

        let id = state.alloc_id();
        let adjustment = TransferStockAdjustment {
            id: id.into(),
            item_id: input.item_id,
            giving_warehouse_id: input.giving_warehouse_id,
            receiving_warehouse_id: input.receiving_warehouse_id,
            quantity: input.quantity.get(),
            reference_number: input.reference_number.as_str().to_owned(),
            notes: input.notes.clone(),
            created_at: Utc::now(),
        };

        if let Some(item) = state.items.get_mut(&input.item_id) {
            item.quantity -= input.quantity.get();
            item.updated_at = adjustment.created_at;
        }
        state.transfer_adjustments.push(adjustment.clone());

        Ok(adjustment)
    }

    async fn create_sale(
        &self,
        reference_number: &str,
        lines: &[SaleLine],
        total_amount: Decimal,
    ) -> Result<SaleWithItems, RepositoryError> {
        let mut state = self.state.lock().await;

        // Validate every line before touching any quantity so a rejected
        // sale leaves no partial state. Repeated items accumulate.
        let mut pending: HashMap<ItemId, i32> = HashMap::new();
        for line in lines {
            let available = state
                .items
                .get(&line.item_id)
                .map(|item| item.quantity)
                .ok_or(RepositoryError::NotFound {
                    entity: "item",
                    id: line.item_id.as_i32(),
                })?;

            let already_claimed = pending.get(&line.item_id).copied().unwrap_or(0);
            let remaining = available - already_claimed;
            if remaining < line.quantity.get() {
                return Err(RepositoryError::InsufficientStock {
                    item_id: line.item_id,
                    requested: line.quantity.get(),
                    available: remaining,
                });
            }
            *pending.entry(line.item_id).or_insert(0) += line.quantity.get();
        }

        let now = Utc::now();
        let sale_id = SaleId::new(state.alloc_id());
        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let line_id = state.alloc_id();
            items.push(SaleItem {
                id: line_id.into(),
                sale_id,
                item_id: line.item_id,
                quantity_sold: line.quantity.get(),
                price_per_item: line.price,
            });

            if let Some(item) = state.items.get_mut(&line.item_id) {
                item.quantity -= line.quantity.get();
                item.updated_at = now;
            }
        }

        let sale = SaleWithItems {
            sale: Sale {
                id: sale_id,
                reference_number: reference_number.to_owned(),
                total_amount,
                created_at: now,
            },
            items,
        };
        state.sales.push(sale.clone());

        Ok(sale)
    }

    async fn delete_sale(&self, id: SaleId) -> Result<SaleWithItems, RepositoryError> {
        let mut state = self.state.lock().await;

        let position = state
            .sales
            .iter()
            .position(|sale| sale.sale.id == id)
            .ok_or(RepositoryError::NotFound {
                entity: "sale",
                id: id.as_i32(),
            })?;

        let sale = state.sales.remove(position);
        let now = Utc::now();
        for line in &sale.items {
            if let Some(item) = state.items.get_mut(&line.item_id) {
                item.quantity += line.quantity_sold;
                item.updated_at = now;
            }
        }

        Ok(sale)
    }

    async fn sale(&self, id: SaleId) -> Result<Option<SaleWithItems>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.sales.iter().find(|sale| sale.sale.id == id).cloned())
    }

    async fn add_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<AddStockAdjustment>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .add_adjustments
            .iter()
            .filter(|adjustment| adjustment.created_at >= since)
            .cloned()
            .collect())
    }

    async fn transfer_stock_adjustments_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TransferStockAdjustment>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .transfer_adjustments
            .iter()
            .filter(|adjustment| adjustment.created_at >= since)
            .cloned()
            .collect())
    }

    async fn sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<SaleWithItems>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .sales
            .iter()
            .filter(|sale| sale.sale.created_at >= since)
            .cloned()
            .collect())
    }
}
