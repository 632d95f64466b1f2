//! Inventory domain module.
//!
//! This crate contains business rules for catalog entries, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod kind;
pub mod record;

pub use item::{InventoryItem, ItemDescription};
pub use kind::ItemKind;
pub use record::{EXPIRY_FORMAT, ItemRecord, format_expiry, parse_expiry};
