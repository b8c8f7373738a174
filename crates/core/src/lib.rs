//! Stockroom Core - Shared types library.
//!
//! This crate provides the common types used across Stockroom components:
//! - `server` - Inventory back-office HTTP service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, reference numbers, and
//!   stock quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
