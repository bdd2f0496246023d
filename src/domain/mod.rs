//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains some of:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching API responses
//! - `convert.rs` — `TryFrom` conversions with validation
//! - `state.rs` — State containers with update methods (for snapshot-driven data)
//! - `client.rs` — Sub-client with HTTP methods

pub mod coin;
pub mod price_history;
pub mod watchlist;
