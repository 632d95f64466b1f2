//! Behavior every `InventoryStore` implementation must share.

use chrono::NaiveDate;

use farmacia_core::{DomainError, ItemCode};
use farmacia_inventory::ItemRecord;

use super::{InventoryStore, StoreError};

pub(crate) fn record(code: &str, commercial_name: &str, stock: i64) -> ItemRecord {
    ItemRecord {
        code: ItemCode::new(code).unwrap(),
        commercial_name: commercial_name.to_string(),
        generic_name: "Amoxicilina".to_string(),
        manufacturer: "GSK".to_string(),
        expiry: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
        batch: "L-001".to_string(),
        dosage_form: "Cápsulas 500mg".to_string(),
        price: 12.5,
        stock,
        route: "oral".to_string(),
    }
}

fn codes(records: &[ItemRecord]) -> Vec<&str> {
    let mut codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
    codes.sort_unstable();
    codes
}

pub(crate) async fn exercise<S: InventoryStore>(store: S) {
    store.initialize_schema().await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());

    // Insert round-trips every field.
    let amoxil = record("AB1", "Amoxil", 10);
    store.insert(&amoxil).await.unwrap();
    let all = store.list_all().await.unwrap();
    assert_eq!(all, vec![amoxil.clone()]);

    store.insert(&record("AB2", "Zitromax", 3)).await.unwrap();
    store.insert(&record("AB3", "amoxil junior", 0)).await.unwrap();
    store.insert(&record("AB4", "Cipro 100%_x", 7)).await.unwrap();

    // Duplicate code fails and leaves the count unchanged.
    let err = store
        .insert(&record("AB1", "Otro nombre", 1))
        .await
        .unwrap_err();
    match err {
        StoreError::DuplicateCode(code) => assert_eq!(code.as_str(), "AB1"),
        other => panic!("Expected DuplicateCode, got {other:?}"),
    }
    assert_eq!(store.list_all().await.unwrap().len(), 4);

    // Invalid records are rejected before touching storage.
    let mut invalid = record("AB9", "Sin lote", 1);
    invalid.batch = String::new();
    assert!(matches!(
        store.insert(&invalid).await,
        Err(StoreError::Domain(DomainError::Validation(_)))
    ));
    assert_eq!(store.list_all().await.unwrap().len(), 4);

    // Search: case-sensitive substring, empty matches all, wildcards are literal.
    assert_eq!(codes(&store.search_by_name("Amox").await.unwrap()), vec!["AB1"]);
    assert_eq!(codes(&store.search_by_name("moxil").await.unwrap()), vec!["AB1", "AB3"]);
    assert_eq!(
        codes(&store.search_by_name("").await.unwrap()),
        codes(&store.list_all().await.unwrap())
    );
    assert_eq!(codes(&store.search_by_name("100%_").await.unwrap()), vec!["AB4"]);
    assert_eq!(store.search_by_name("%").await.unwrap().len(), 1);
    assert!(store.search_by_name("Penicilina").await.unwrap().is_empty());

    // Lookup by code.
    let code = ItemCode::new("AB2").unwrap();
    assert_eq!(store.find_by_code(&code).await.unwrap().unwrap().stock, 3);
    assert!(
        store
            .find_by_code(&ItemCode::new("NOPE").unwrap())
            .await
            .unwrap()
            .is_none()
    );

    // Stock adjustment is persisted and never goes negative.
    assert_eq!(store.adjust_stock(&code, 5).await.unwrap(), 8);
    assert_eq!(store.adjust_stock(&code, -8).await.unwrap(), 0);
    let err = store.adjust_stock(&code, -1).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(DomainError::InvariantViolation(_))
    ));
    assert_eq!(store.find_by_code(&code).await.unwrap().unwrap().stock, 0);

    let err = store
        .adjust_stock(&ItemCode::new("NOPE").unwrap(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(DomainError::NotFound)));

    // Overflow is refused like going negative, and the table stays readable.
    let full = record("AB5", "Penbritin", i64::MAX);
    store.insert(&full).await.unwrap();
    for delta in [1, i64::MAX] {
        let err = store.adjust_stock(&full.code, delta).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InvariantViolation(_))
        ));
    }
    let near_full = ItemCode::new("AB1").unwrap();
    assert!(matches!(
        store.adjust_stock(&near_full, i64::MAX - 5).await,
        Err(StoreError::Domain(DomainError::InvariantViolation(_)))
    ));
    assert_eq!(store.adjust_stock(&near_full, i64::MAX - 10).await.unwrap(), i64::MAX);
    assert_eq!(
        store.find_by_code(&full.code).await.unwrap().unwrap().stock,
        i64::MAX
    );
    assert_eq!(store.list_all().await.unwrap().len(), 5);
}
