use std::sync::RwLock;

use async_trait::async_trait;

use farmacia_core::{DomainError, ItemCode};
use farmacia_inventory::ItemRecord;

use super::r#trait::{InventoryStore, StoreError, stock_out_of_range};

/// In-memory record store for tests/dev.
///
/// Keeps insertion order; same contract as the SQLite store.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    records: RwLock<Vec<ItemRecord>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn initialize_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, record: &ItemRecord) -> Result<(), StoreError> {
        record.validate()?;

        let mut records = self.records.write().map_err(poisoned)?;
        if records.iter().any(|r| r.code == record.code) {
            return Err(StoreError::DuplicateCode(record.code.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.clone())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ItemRecord>, StoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.commercial_name.contains(fragment))
            .cloned()
            .collect())
    }

    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<ItemRecord>, StoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.iter().find(|r| &r.code == code).cloned())
    }

    async fn adjust_stock(&self, code: &ItemCode, delta: i64) -> Result<i64, StoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let record = records
            .iter_mut()
            .find(|r| &r.code == code)
            .ok_or(StoreError::Domain(DomainError::not_found()))?;

        let new_stock = record
            .stock
            .checked_add(delta)
            .filter(|s| *s >= 0)
            .ok_or_else(|| stock_out_of_range(code, record.stock, delta))?;
        record.stock = new_stock;
        Ok(new_stock)
    }
}
