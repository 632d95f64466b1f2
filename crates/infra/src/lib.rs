//! Infrastructure layer: persistence, inventory queries, configuration.

pub mod config;
pub mod query;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use query::{
    DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_LOW_STOCK_THRESHOLD, InventoryQueryService, QueryError,
};
pub use store::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore, StoreError};
