//! Storage layer for the stock ledger.
//!
//! # Tables
//!
//! - `item` - catalog items with the global on-hand `quantity`
//! - `add_stock_adjustment` - append-only stock receipt ledger
//! - `transfer_stock_adjustment` - append-only transfer ledger
//! - `sale` / `sale_item` - sale aggregates
//! - `warehouse`, `category`, `brand`, `unit` - read-mostly reference data
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are applied at startup
//! via [`run_migrations`].
//!
//! # Implementations
//!
//! [`InventoryStore`] is the seam between services and storage. The
//! [`PgInventoryStore`] implementation runs every mutation inside one
//! `PostgreSQL` transaction with storage-level conditional updates; the
//! [`MemoryInventoryStore`] implementation serializes operations behind a
//! single mutex and exists for tests and local development.

pub mod memory;
pub mod postgres;
pub mod store;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use stockroom_core::ItemId;

pub use memory::MemoryInventoryStore;
pub use postgres::PgInventoryStore;
pub use store::InventoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx. Guaranteed no partial state: any failure
    /// inside an atomic unit rolls the whole transaction back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A referenced entity was not found.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"item"` or `"warehouse"`.
        entity: &'static str,
        /// The unresolvable ID.
        id: i32,
    },

    /// The operation would drive the item's on-hand quantity negative.
    #[error("insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: ItemId,
        requested: i32,
        available: i32,
    },

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is the single, explicitly owned database handle of the process;
/// it is created at startup and injected through `AppState`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
