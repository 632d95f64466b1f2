//! Persistence boundary for catalog records.
//!
//! The store only speaks [`ItemRecord`](farmacia_inventory::ItemRecord); it knows
//! nothing about the behavioral model built on top of it.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use sqlite::SqliteInventoryStore;
pub use r#trait::{InventoryStore, StoreError};

#[cfg(test)]
pub(crate) mod contract;
