use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use farmacia_core::{DomainError, ItemCode};
use farmacia_inventory::ItemRecord;

/// Store operation error.
///
/// `Domain` carries deterministic business failures (invalid record, unknown code,
/// stock would go negative); `Database`/`Backend` are infrastructure failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("codigo '{0}' already exists")]
    DuplicateCode(ItemCode),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Backend(String),
}

impl StoreError {
    /// True for failures caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::DuplicateCode(_) | StoreError::Domain(_))
    }
}

/// Durable record storage keyed by business code.
///
/// Each operation is individually atomic; nothing spans calls.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Ensure the backing table exists. Idempotent.
    async fn initialize_schema(&self) -> Result<(), StoreError>;

    /// Persist a new record. Fails on invalid fields or an existing code.
    async fn insert(&self, record: &ItemRecord) -> Result<(), StoreError>;

    /// Every record, in storage order (no defined sort).
    async fn list_all(&self) -> Result<Vec<ItemRecord>, StoreError>;

    /// Records whose commercial name contains `fragment` (case-sensitive).
    /// The empty fragment matches everything.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ItemRecord>, StoreError>;

    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<ItemRecord>, StoreError>;

    /// Atomically apply `stock += delta` for `code` and return the new stock.
    ///
    /// Fails with `DomainError::NotFound` for an unknown code and
    /// `DomainError::InvariantViolation` (record untouched) if the result would be negative.
    async fn adjust_stock(&self, code: &ItemCode, delta: i64) -> Result<i64, StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn initialize_schema(&self) -> Result<(), StoreError> {
        (**self).initialize_schema().await
    }

    async fn insert(&self, record: &ItemRecord) -> Result<(), StoreError> {
        (**self).insert(record).await
    }

    async fn list_all(&self) -> Result<Vec<ItemRecord>, StoreError> {
        (**self).list_all().await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ItemRecord>, StoreError> {
        (**self).search_by_name(fragment).await
    }

    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<ItemRecord>, StoreError> {
        (**self).find_by_code(code).await
    }

    async fn adjust_stock(&self, code: &ItemCode, delta: i64) -> Result<i64, StoreError> {
        (**self).adjust_stock(code, delta).await
    }
}

/// Rejection for a delta that would take stock below zero or past `i64::MAX`.
pub(crate) fn stock_out_of_range(code: &ItemCode, stock: i64, delta: i64) -> StoreError {
    StoreError::Domain(DomainError::invariant(format!(
        "stock of '{code}' must stay between 0 and {max} (stock: {stock}, delta: {delta})",
        max = i64::MAX
    )))
}
