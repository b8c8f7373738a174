//! Domain models for the Stockroom inventory back office.

pub mod adjustment;
pub mod analytics;
pub mod item;
pub mod sale;

pub use adjustment::{
    AddStockAdjustment, NewAddStock, NewTransferStock, TransferStockAdjustment,
};
pub use analytics::{
    BusinessReport, DailyMovement, InventoryValuation, ItemMovement, LowStockItem,
    LowStockReport, LowStockSeverity, StockMovement, TopSellingItem, ValuationGroup,
    WarehouseMovement,
};
pub use item::{Brand, Category, Item, Unit, Warehouse};
pub use sale::{Sale, SaleItem, SaleLine, SaleWithItems};
