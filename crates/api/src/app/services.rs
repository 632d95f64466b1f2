//! Infrastructure wiring behind the HTTP handlers.

use std::sync::Arc;

use farmacia_infra::{
    AppConfig, InMemoryInventoryStore, InventoryQueryService, InventoryStore,
    SqliteInventoryStore, StoreError,
};

pub type SharedStore = Arc<dyn InventoryStore>;

/// Dashboard defaults, overridable per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardDefaults {
    pub low_stock_threshold: i64,
    pub expiry_window_days: i64,
}

impl From<&AppConfig> for DashboardDefaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            expiry_window_days: config.expiry_window_days,
        }
    }
}

pub struct AppServices {
    inventory: InventoryQueryService<SharedStore>,
    dashboard: DashboardDefaults,
}

impl AppServices {
    pub fn new(store: SharedStore, dashboard: DashboardDefaults) -> Self {
        Self {
            inventory: InventoryQueryService::new(store),
            dashboard,
        }
    }

    pub fn inventory(&self) -> &InventoryQueryService<SharedStore> {
        &self.inventory
    }

    pub fn dashboard_defaults(&self) -> DashboardDefaults {
        self.dashboard
    }
}

/// SQLite-backed services; the schema is created if missing.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store = SqliteInventoryStore::open(&config.database_path);
    store.initialize_schema().await?;
    tracing::info!(path = %config.database_path.display(), "inventory store ready");

    Ok(AppServices::new(Arc::new(store), config.into()))
}

/// Ephemeral services (dev/test): nothing survives the process.
pub fn build_in_memory_services(config: &AppConfig) -> AppServices {
    AppServices::new(Arc::new(InMemoryInventoryStore::new()), config.into())
}
