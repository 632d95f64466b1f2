//! Inventory queries: store records hydrated into items, filtered by business rules.

use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

use farmacia_core::{DomainError, ItemCode};
use farmacia_inventory::{InventoryItem, ItemRecord};

use crate::store::{InventoryStore, StoreError};

/// Stock strictly below this is "low" unless the caller says otherwise.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Look-ahead window for expiry alerts, in days.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A stored row no longer passes validation.
    #[error("stored record '{code}' is invalid: {source}")]
    CorruptRecord { code: ItemCode, source: DomainError },
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(e) => QueryError::Domain(e),
            other => QueryError::Store(other),
        }
    }
}

/// Composes a store with the item model.
///
/// Results keep store order; nothing here sorts.
#[derive(Debug, Clone)]
pub struct InventoryQueryService<S> {
    store: S,
}

impl<S> InventoryQueryService<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Rows that fail validation are logged and left out of listings.
    fn hydrate(records: Vec<ItemRecord>) -> Vec<InventoryItem> {
        records
            .into_iter()
            .filter_map(|record| {
                let code = record.code.clone();
                InventoryItem::from_record(record)
                    .inspect_err(|e| {
                        tracing::warn!(codigo = %code, error = %e, "skipping invalid stored record");
                    })
                    .ok()
            })
            .collect()
    }

    /// Intake: persist a new record.
    pub async fn register(&self, record: &ItemRecord) -> Result<(), StoreError> {
        self.store.insert(record).await
    }

    pub async fn list_all(&self) -> Result<Vec<InventoryItem>, QueryError> {
        Ok(Self::hydrate(self.store.list_all().await?))
    }

    /// Items with `stock < threshold`.
    pub async fn list_low_stock(&self, threshold: i64) -> Result<Vec<InventoryItem>, QueryError> {
        let items = self.list_all().await?;
        Ok(items.into_iter().filter(|i| i.stock() < threshold).collect())
    }

    /// Items expiring within `within_days` of today's local date.
    pub async fn list_expiring_soon(
        &self,
        within_days: i64,
    ) -> Result<Vec<InventoryItem>, QueryError> {
        self.list_expiring_soon_at(today(), within_days).await
    }

    /// Items with `today < expiry <= today + within_days`.
    ///
    /// The horizon day itself is included. Already-expired items are not part of
    /// this alert; see [`Self::list_expired_at`].
    pub async fn list_expiring_soon_at(
        &self,
        today: NaiveDate,
        within_days: i64,
    ) -> Result<Vec<InventoryItem>, QueryError> {
        let horizon = Duration::try_days(within_days)
            .and_then(|d| today.checked_add_signed(d))
            .unwrap_or(if within_days < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            });
        let items = self.list_all().await?;
        Ok(items
            .into_iter()
            .filter(|i| i.expiry() <= horizon && i.is_within_expiry(today))
            .collect())
    }

    /// Items no longer within expiry on `today`.
    pub async fn list_expired_at(&self, today: NaiveDate) -> Result<Vec<InventoryItem>, QueryError> {
        let items = self.list_all().await?;
        Ok(items
            .into_iter()
            .filter(|i| !i.is_within_expiry(today))
            .collect())
    }

    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<InventoryItem>, QueryError> {
        Ok(Self::hydrate(self.store.search_by_name(fragment).await?))
    }

    pub async fn find_by_code(&self, code: &ItemCode) -> Result<InventoryItem, QueryError> {
        let record = self
            .store
            .find_by_code(code)
            .await?
            .ok_or(DomainError::NotFound)?;
        InventoryItem::from_record(record).map_err(|source| QueryError::CorruptRecord {
            code: code.clone(),
            source,
        })
    }

    /// Adjust stock and persist it.
    ///
    /// The model rule is checked first against the loaded quantity; the store then
    /// applies the delta atomically, so a concurrent writer cannot push stock below
    /// zero between the two steps.
    pub async fn adjust_stock(
        &self,
        code: &ItemCode,
        delta: i64,
    ) -> Result<InventoryItem, QueryError> {
        let mut item = self.find_by_code(code).await?;
        item.adjust_stock(delta)?;

        let persisted = self.store.adjust_stock(code, delta).await?;
        tracing::debug!(codigo = %code, delta, stock = persisted, "stock persisted");
        let mut record = item.into_record();
        record.stock = persisted;
        Ok(InventoryItem::from_record(record)?)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
