//! Stockroom server library.
//!
//! Back-office stock ledger service: atomic stock receipts, inter-warehouse
//! transfers, reversible sales, and read-only analytics over a
//! `PostgreSQL`-backed inventory.
//!
//! Exposed as a library so the HTTP surface and service layer can be tested
//! against the in-memory store without a running database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
