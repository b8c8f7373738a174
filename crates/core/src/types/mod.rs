//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod quantity;
pub mod reference;

pub use id::*;
pub use quantity::{QuantityError, StockQuantity};
pub use reference::{ReferenceError, ReferenceNumber};
