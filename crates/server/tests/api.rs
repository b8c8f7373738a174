//! HTTP surface tests.
//!
//! Drives the assembled router in-process with `tower::ServiceExt::oneshot`
//! against the in-memory store, checking status codes and JSON bodies.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use stockroom_core::ItemId;
use stockroom_server::config::ServerConfig;
use stockroom_server::db::memory::{ItemSeed, MemoryInventoryStore};
use stockroom_server::db::InventoryStore;
use stockroom_server::routes;
use stockroom_server::services::{ActivityLog, MemorySink};
use stockroom_server::state::AppState;

struct TestApp {
    router: Router,
    store: Arc<MemoryInventoryStore>,
    item_id: ItemId,
    warehouse_id: stockroom_core::WarehouseId,
    other_warehouse_id: stockroom_core::WarehouseId,
}

async fn test_app() -> TestApp {
    let store = Arc::new(MemoryInventoryStore::new());
    let warehouse = store.seed_warehouse("Main", "Springfield", "storage").await;
    let other = store.seed_warehouse("Outlet", "Shelbyville", "retail").await;
    let item = store
        .seed_item(ItemSeed {
            title: "Widget".to_owned(),
            sku: "WID-001".to_owned(),
            quantity: 10,
            reorder_point: Some(4),
            selling_price: Decimal::new(450, 2),
            buying_price: Decimal::new(300, 2),
            ..ItemSeed::default()
        })
        .await;

    let config = ServerConfig {
        database_url: SecretString::from("postgres://unused/test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        movement_window_days: 30,
        elevated_roles: vec!["admin".to_string()],
        log_json: false,
    };
    let activity = ActivityLog::spawn(Arc::new(MemorySink::new()));
    let state = AppState::new(
        config,
        Arc::clone(&store) as Arc<dyn InventoryStore>,
        activity,
    );
    let router = routes::routes().with_state(state);

    TestApp {
        router,
        store,
        item_id: item.id,
        warehouse_id: warehouse.id,
        other_warehouse_id: other.id,
    }
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;

    let response = app.router.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(get_request("/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Adjustments
// =============================================================================

#[tokio::test]
async fn test_add_stock_created() {
    let app = test_app().await;
    let body = json!({
        "itemId": app.item_id,
        "warehouseId": app.warehouse_id,
        "addStockQuantity": 5,
        "referenceNumber": "GRN-42",
    });

    let response = app
        .router
        .oneshot(json_request("POST", "/adjustments/add", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["addStockQuantity"], 5);
    assert_eq!(json["referenceNumber"], "GRN-42");

    let item = app.store.item(app.item_id).await.unwrap().unwrap();
    assert_eq!(item.quantity, 15);
}

#[tokio::test]
async fn test_add_stock_invalid_quantity_is_400() {
    let app = test_app().await;
    let body = json!({
        "itemId": app.item_id,
        "warehouseId": app.warehouse_id,
        "addStockQuantity": 0,
        "referenceNumber": "GRN-42",
    });

    let response = app
        .router
        .oneshot(json_request("POST", "/adjustments/add", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_add_stock_unknown_item_is_404() {
    let app = test_app().await;
    let body = json!({
        "itemId": 9999,
        "warehouseId": app.warehouse_id,
        "addStockQuantity": 5,
        "referenceNumber": "GRN-42",
    });

    let response = app
        .router
        .oneshot(json_request("POST", "/adjustments/add", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transfer_insufficient_stock_is_409() {
    let app = test_app().await;
    let body = json!({
        "itemId": app.item_id,
        "givingWarehouseId": app.warehouse_id,
        "receivingWarehouseId": app.other_warehouse_id,
        "transferStockQuantity": 99,
        "referenceNumber": "TRF-1",
    });

    let response = app
        .router
        .oneshot(json_request("POST", "/adjustments/transfer", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "insufficient_stock");

    // Rejected transfer left the quantity untouched.
    let item = app.store.item(app.item_id).await.unwrap().unwrap();
    assert_eq!(item.quantity, 10);
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_create_and_delete_sale() {
    let app = test_app().await;
    let body = json!({
        "items": [{ "id": app.item_id, "quantity": 3, "price": "4.50" }],
        "totalAmount": "13.50",
    });

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/sales", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let reference = json["referenceNumber"].as_str().unwrap();
    assert!(reference.starts_with("SALE-"));
    assert_eq!(json["items"].as_array().unwrap().len(), 1);

    let item = app.store.item(app.item_id).await.unwrap().unwrap();
    assert_eq!(item.quantity, 7);

    // Delete with the elevated role restores the stock.
    let sale_id = json["id"].as_i64().unwrap();
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/sales/{sale_id}"))
        .header("x-stockroom-role", "admin")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let item = app.store.item(app.item_id).await.unwrap().unwrap();
    assert_eq!(item.quantity, 10);
}

#[tokio::test]
async fn test_sale_total_mismatch_is_400() {
    let app = test_app().await;
    let body = json!({
        "items": [{ "id": app.item_id, "quantity": 3, "price": "4.50" }],
        "totalAmount": "99.00",
    });

    let response = app
        .router
        .oneshot(json_request("POST", "/sales", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_sale_without_role_is_403() {
    let app = test_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/sales/1")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A non-elevated role is rejected the same way.
    let request = Request::builder()
        .method("DELETE")
        .uri("/sales/1")
        .header("x-stockroom-role", "clerk")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_delete_unknown_sale_is_404() {
    let app = test_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/sales/424242")
        .header("x-stockroom-role", "admin")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_low_stock_endpoint() {
    let app = test_app().await;
    app.store
        .seed_item(ItemSeed {
            title: "Scarce".to_owned(),
            quantity: 1,
            reorder_point: Some(5),
            ..ItemSeed::default()
        })
        .await;

    let response = app
        .router
        .oneshot(get_request("/analytics/low-stock"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let warning = json["warning"].as_array().unwrap();
    assert_eq!(warning.len(), 1);
    assert_eq!(warning[0]["title"], "Scarce");
    assert_eq!(warning[0]["severity"], "warning");
}

#[tokio::test]
async fn test_inventory_value_endpoint() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(get_request("/analytics/inventory-value"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    // 10 x 4.50 on hand.
    assert_eq!(json["totalInventoryValue"], "45.00");
}

#[tokio::test]
async fn test_stock_movement_endpoint_with_days() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(get_request("/analytics/stock-movement?days=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["windowDays"], 7);
}

#[tokio::test]
async fn test_reports_endpoint() {
    let app = test_app().await;

    let response = app.router.oneshot(get_request("/reports")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["periodDays"], 30);
    assert!(json["topSellingItems"].as_array().unwrap().is_empty());
}
