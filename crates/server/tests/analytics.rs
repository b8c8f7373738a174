//! Integration tests for the analytics aggregator.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use stockroom_core::{ReferenceNumber, StockQuantity};
use stockroom_server::db::memory::{ItemSeed, MemoryInventoryStore};
use stockroom_server::db::InventoryStore;
use stockroom_server::models::{LowStockSeverity, NewAddStock, NewTransferStock, SaleLine};
use stockroom_server::services::AnalyticsService;

fn service(store: &Arc<MemoryInventoryStore>) -> AnalyticsService {
    AnalyticsService::new(Arc::clone(store) as Arc<dyn InventoryStore>, 30)
}

// =============================================================================
// Low stock
// =============================================================================

#[tokio::test]
async fn test_low_stock_partition_and_order() {
    let store = Arc::new(MemoryInventoryStore::new());

    // quantity 2, reorder point 5 -> warning
    store
        .seed_item(ItemSeed {
            title: "Bolts".to_owned(),
            quantity: 2,
            reorder_point: Some(5),
            ..ItemSeed::default()
        })
        .await;
    // no reorder point -> never flagged
    store
        .seed_item(ItemSeed {
            title: "Nuts".to_owned(),
            quantity: 10,
            reorder_point: None,
            ..ItemSeed::default()
        })
        .await;
    // quantity 0 -> critical
    store
        .seed_item(ItemSeed {
            title: "Washers".to_owned(),
            quantity: 0,
            reorder_point: Some(3),
            ..ItemSeed::default()
        })
        .await;
    // above its reorder point -> not flagged
    store
        .seed_item(ItemSeed {
            title: "Screws".to_owned(),
            quantity: 9,
            reorder_point: Some(5),
            ..ItemSeed::default()
        })
        .await;

    let report = service(&store).low_stock().await.unwrap();

    assert_eq!(report.warning.len(), 1);
    assert_eq!(report.warning[0].title, "Bolts");
    assert_eq!(report.warning[0].severity, LowStockSeverity::Warning);

    assert_eq!(report.critical.len(), 1);
    assert_eq!(report.critical[0].title, "Washers");
    assert_eq!(report.critical[0].severity, LowStockSeverity::Critical);
}

#[tokio::test]
async fn test_low_stock_unknown_labels() {
    let store = Arc::new(MemoryInventoryStore::new());
    let category = store.seed_category("Hardware").await;
    store
        .seed_item(ItemSeed {
            title: "Bolts".to_owned(),
            quantity: 1,
            reorder_point: Some(5),
            category_id: Some(category.id),
            ..ItemSeed::default()
        })
        .await;

    let report = service(&store).low_stock().await.unwrap();
    let flagged = &report.warning[0];

    assert_eq!(flagged.category, "Hardware");
    // Missing relations render as "Unknown" rather than failing.
    assert_eq!(flagged.brand, "Unknown");
    assert_eq!(flagged.unit, "Unknown");
    assert_eq!(flagged.warehouse, "Unknown");
}

// =============================================================================
// Valuation
// =============================================================================

#[tokio::test]
async fn test_valuation_totals_and_margin() {
    let store = Arc::new(MemoryInventoryStore::new());
    store
        .seed_item(ItemSeed {
            quantity: 10,
            selling_price: Decimal::from(20),
            buying_price: Decimal::from(15),
            ..ItemSeed::default()
        })
        .await;
    store
        .seed_item(ItemSeed {
            quantity: 5,
            selling_price: Decimal::from(40),
            buying_price: Decimal::from(30),
            ..ItemSeed::default()
        })
        .await;

    let valuation = service(&store).inventory_valuation().await.unwrap();

    // 10*20 + 5*40 = 400; 10*15 + 5*30 = 300.
    assert_eq!(valuation.total_inventory_value, Decimal::from(400));
    assert_eq!(valuation.total_cost_value, Decimal::from(300));
    assert_eq!(valuation.profit_margin, Decimal::from(25));
}

#[tokio::test]
async fn test_valuation_empty_inventory_margin_is_zero() {
    let store = Arc::new(MemoryInventoryStore::new());

    let valuation = service(&store).inventory_valuation().await.unwrap();

    assert_eq!(valuation.total_inventory_value, Decimal::ZERO);
    assert_eq!(valuation.profit_margin, Decimal::ZERO);
    assert!(valuation.by_category.is_empty());
}

#[tokio::test]
async fn test_valuation_groups_by_category_and_warehouse() {
    let store = Arc::new(MemoryInventoryStore::new());
    let hardware = store.seed_category("Hardware").await;
    let main = store.seed_warehouse("Main", "Springfield", "storage").await;

    store
        .seed_item(ItemSeed {
            quantity: 2,
            selling_price: Decimal::from(10),
            buying_price: Decimal::from(6),
            category_id: Some(hardware.id),
            warehouse_id: Some(main.id),
            ..ItemSeed::default()
        })
        .await;
    store
        .seed_item(ItemSeed {
            quantity: 1,
            selling_price: Decimal::from(8),
            buying_price: Decimal::from(5),
            ..ItemSeed::default()
        })
        .await;

    let valuation = service(&store).inventory_valuation().await.unwrap();

    let hardware_group = valuation
        .by_category
        .iter()
        .find(|group| group.label == "Hardware")
        .unwrap();
    assert_eq!(hardware_group.item_count, 1);
    assert_eq!(hardware_group.total_value, Decimal::from(20));

    let unknown_group = valuation
        .by_category
        .iter()
        .find(|group| group.label == "Unknown")
        .unwrap();
    assert_eq!(unknown_group.total_value, Decimal::from(8));

    assert!(
        valuation
            .by_warehouse
            .iter()
            .any(|group| group.label == "Main")
    );
}

// =============================================================================
// Stock movement
// =============================================================================

#[tokio::test]
async fn test_stock_movement_totals() {
    let store = Arc::new(MemoryInventoryStore::new());
    let main = store.seed_warehouse("Main", "Springfield", "storage").await;
    let outlet = store.seed_warehouse("Outlet", "Shelbyville", "retail").await;
    let item = store
        .seed_item(ItemSeed {
            title: "Widget".to_owned(),
            quantity: 50,
            ..ItemSeed::default()
        })
        .await;

    store
        .apply_add_stock(&NewAddStock {
            item_id: item.id,
            warehouse_id: main.id,
            quantity: StockQuantity::new(12).unwrap(),
            reference_number: ReferenceNumber::parse("GRN-1").unwrap(),
            notes: None,
        })
        .await
        .unwrap();
    store
        .apply_transfer_stock(&NewTransferStock {
            item_id: item.id,
            giving_warehouse_id: main.id,
            receiving_warehouse_id: outlet.id,
            quantity: StockQuantity::new(4).unwrap(),
            reference_number: ReferenceNumber::parse("TRF-1").unwrap(),
            notes: None,
        })
        .await
        .unwrap();

    let movement = service(&store).stock_movement(None).await.unwrap();

    assert_eq!(movement.window_days, 30);
    assert_eq!(movement.total_added, 12);
    assert_eq!(movement.total_transferred, 4);

    // Everything happened today, so one daily bucket.
    assert_eq!(movement.by_day.len(), 1);
    assert_eq!(movement.by_day[0].added, 12);
    assert_eq!(movement.by_day[0].transferred, 4);

    assert_eq!(movement.by_item.len(), 1);
    assert_eq!(movement.by_item[0].title, "Widget");

    // Receipts credit the receiving warehouse, transfers the giving one;
    // both landed in Main here.
    let main_movement = movement
        .by_warehouse
        .iter()
        .find(|entry| entry.warehouse == "Main")
        .unwrap();
    assert_eq!(main_movement.added, 12);
    assert_eq!(main_movement.transferred, 4);

    // All movement is in the recent 7 days and none in the prior 7, so the
    // growth rate stays 0 instead of dividing by zero.
    assert!((movement.growth_rate - 0.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_stock_movement_respects_days_param() {
    let store = Arc::new(MemoryInventoryStore::new());
    let movement = service(&store).stock_movement(Some(7)).await.unwrap();
    assert_eq!(movement.window_days, 7);
    assert_eq!(movement.total_added, 0);
    assert!(movement.by_day.is_empty());
}

// =============================================================================
// Business report
// =============================================================================

#[tokio::test]
async fn test_report_totals() {
    let store = Arc::new(MemoryInventoryStore::new());
    let item = store
        .seed_item(ItemSeed {
            title: "Widget".to_owned(),
            quantity: 100,
            selling_price: Decimal::from(10),
            buying_price: Decimal::from(6),
            tax_rate: Some(Decimal::from(20)),
            ..ItemSeed::default()
        })
        .await;

    store
        .create_sale(
            "SALE-TEST0001",
            &[SaleLine {
                item_id: item.id,
                quantity: StockQuantity::new(3).unwrap(),
                price: Decimal::from(10),
            }],
            Decimal::from(30),
        )
        .await
        .unwrap();

    let report = service(&store).report().await.unwrap();

    assert_eq!(report.period_days, 30);
    assert_eq!(report.total_sales, Decimal::from(30));
    assert_eq!(report.total_sales_quantity, 3);
    // (10 - 6) * 3 = 12 profit; 30 * 20% = 6 tax.
    assert_eq!(report.total_profit, Decimal::from(12));
    assert_eq!(report.total_tax, Decimal::from(6));

    assert_eq!(report.top_selling_items.len(), 1);
    assert_eq!(report.top_selling_items[0].title, "Widget");
    assert_eq!(report.top_selling_items[0].quantity_sold, 3);
    assert_eq!(report.top_selling_items[0].revenue, Decimal::from(30));
}

#[tokio::test]
async fn test_report_top_sellers_ranked_by_quantity() {
    let store = Arc::new(MemoryInventoryStore::new());
    let slow = store
        .seed_item(ItemSeed {
            title: "Slow".to_owned(),
            quantity: 100,
            ..ItemSeed::default()
        })
        .await;
    let fast = store
        .seed_item(ItemSeed {
            title: "Fast".to_owned(),
            quantity: 100,
            ..ItemSeed::default()
        })
        .await;

    let price = Decimal::ONE;
    for (item_id, quantity) in [(slow.id, 2), (fast.id, 9)] {
        store
            .create_sale(
                "SALE-TEST0002",
                &[SaleLine {
                    item_id,
                    quantity: StockQuantity::new(quantity).unwrap(),
                    price,
                }],
                Decimal::from(quantity),
            )
            .await
            .unwrap();
    }

    let report = service(&store).report().await.unwrap();
    assert_eq!(report.top_selling_items[0].title, "Fast");
    assert_eq!(report.top_selling_items[1].title, "Slow");
}

#[tokio::test]
async fn test_report_missing_tax_rate_counts_as_zero() {
    let store = Arc::new(MemoryInventoryStore::new());
    let item = store
        .seed_item(ItemSeed {
            quantity: 10,
            selling_price: Decimal::from(5),
            buying_price: Decimal::from(5),
            tax_rate: None,
            ..ItemSeed::default()
        })
        .await;

    store
        .create_sale(
            "SALE-TEST0003",
            &[SaleLine {
                item_id: item.id,
                quantity: StockQuantity::new(2).unwrap(),
                price: Decimal::from(5),
            }],
            Decimal::from(10),
        )
        .await
        .unwrap();

    let report = service(&store).report().await.unwrap();
    assert_eq!(report.total_tax, Decimal::ZERO);
    assert_eq!(report.total_profit, Decimal::ZERO);
}
