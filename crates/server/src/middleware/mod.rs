//! Request extractors used at the HTTP boundary.

pub mod role;

pub use role::{RequireElevated, ROLE_HEADER};
