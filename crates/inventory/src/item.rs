use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmacia_core::{DomainError, DomainResult, ItemCode};

use crate::kind::ItemKind;
use crate::record::{ItemRecord, format_expiry};

/// Catalog entry hydrated from a stored record.
///
/// Request-scoped: built from stored fields, optionally stock-adjusted, then
/// dropped. Only `stock` changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    kind: ItemKind,
    record: ItemRecord,
}

impl InventoryItem {
    /// Hydrate an antibiotic from its stored record.
    pub fn from_record(record: ItemRecord) -> DomainResult<Self> {
        Self::with_kind(ItemKind::Antibiotic, record)
    }

    fn with_kind(kind: ItemKind, record: ItemRecord) -> DomainResult<Self> {
        record.validate()?;
        Ok(Self { kind, record })
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn code(&self) -> &ItemCode {
        &self.record.code
    }

    pub fn commercial_name(&self) -> &str {
        &self.record.commercial_name
    }

    pub fn generic_name(&self) -> &str {
        &self.record.generic_name
    }

    pub fn manufacturer(&self) -> &str {
        &self.record.manufacturer
    }

    pub fn expiry(&self) -> NaiveDate {
        self.record.expiry
    }

    pub fn batch(&self) -> &str {
        &self.record.batch
    }

    pub fn dosage_form(&self) -> &str {
        &self.record.dosage_form
    }

    pub fn price(&self) -> f64 {
        self.record.price
    }

    pub fn stock(&self) -> i64 {
        self.record.stock
    }

    pub fn route(&self) -> &str {
        &self.record.route
    }

    pub fn into_record(self) -> ItemRecord {
        self.record
    }

    /// Apply `stock += delta`, returning the new quantity.
    ///
    /// Rejected without mutation when the result would be negative or overflow.
    /// Does not persist anything.
    pub fn adjust_stock(&mut self, delta: i64) -> DomainResult<i64> {
        let new_stock = self
            .record
            .stock
            .checked_add(delta)
            .filter(|s| *s >= 0)
            .ok_or_else(|| {
                DomainError::invariant(format!(
                    "stock must stay between 0 and {} (stock: {}, delta: {delta})",
                    i64::MAX,
                    self.record.stock
                ))
            })?;
        self.record.stock = new_stock;
        Ok(new_stock)
    }

    /// True while `reference` is strictly before the expiry date.
    pub fn is_within_expiry(&self, reference: NaiveDate) -> bool {
        reference < self.record.expiry
    }

    /// Whole days from `reference` until expiry; zero or negative once expired.
    pub fn days_until_expiry(&self, reference: NaiveDate) -> i64 {
        (self.record.expiry - reference).num_days()
    }

    pub fn requires_prescription(&self) -> bool {
        self.kind.requires_prescription()
    }

    /// A prescription token is accepted when it has any non-whitespace content.
    pub fn validate_prescription(&self, token: &str) -> bool {
        !token.trim().is_empty()
    }

    /// Flat snapshot for display/transport.
    pub fn describe(&self) -> ItemDescription {
        ItemDescription {
            kind: self.kind,
            kind_label: self.kind.label().to_string(),
            code: self.record.code.to_string(),
            commercial_name: self.record.commercial_name.clone(),
            generic_name: self.record.generic_name.clone(),
            manufacturer: self.record.manufacturer.clone(),
            expiry: format_expiry(self.record.expiry),
            batch: self.record.batch.clone(),
            dosage_form: self.record.dosage_form.clone(),
            price: self.record.price,
            stock: self.record.stock,
            route: self.record.route.clone(),
            requires_prescription: self.requires_prescription(),
        }
    }
}

/// Display snapshot of an item. Field names follow the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescription {
    #[serde(rename = "tipo")]
    pub kind: ItemKind,
    #[serde(rename = "tipo_nombre")]
    pub kind_label: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre_comercial")]
    pub commercial_name: String,
    #[serde(rename = "nombre_generico")]
    pub generic_name: String,
    #[serde(rename = "laboratorio")]
    pub manufacturer: String,
    #[serde(rename = "vencimiento")]
    pub expiry: String,
    #[serde(rename = "lote")]
    pub batch: String,
    #[serde(rename = "presentacion")]
    pub dosage_form: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "via_administracion")]
    pub route: String,
    #[serde(rename = "requiere_receta")]
    pub requires_prescription: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_record;

    fn item_with_stock(stock: i64) -> InventoryItem {
        let mut record = sample_record("AB1");
        record.stock = stock;
        InventoryItem::from_record(record).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn hydration_rejects_invalid_record() {
        let mut record = sample_record("AB1");
        record.stock = -3;
        assert!(matches!(
            InventoryItem::from_record(record),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn adjust_stock_commits_non_negative_result() {
        let mut item = item_with_stock(3);
        assert_eq!(item.adjust_stock(-3).unwrap(), 0);
        assert_eq!(item.stock(), 0);
        assert_eq!(item.adjust_stock(7).unwrap(), 7);
    }

    #[test]
    fn adjust_stock_rejects_going_negative() {
        let mut item = item_with_stock(3);
        let err = item.adjust_stock(-10).unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation for negative stock"),
        }
        assert_eq!(item.stock(), 3);
    }

    #[test]
    fn adjust_stock_rejects_overflow() {
        let mut item = item_with_stock(i64::MAX);
        assert!(item.adjust_stock(1).is_err());
        assert_eq!(item.stock(), i64::MAX);
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let item = item_with_stock(1);
        let expiry = item.expiry();
        assert!(item.is_within_expiry(expiry.pred_opt().unwrap()));
        assert!(!item.is_within_expiry(expiry));
        assert!(!item.is_within_expiry(expiry.succ_opt().unwrap()));
    }

    #[test]
    fn days_until_expiry_counts_calendar_days() {
        let item = item_with_stock(1);
        assert_eq!(item.days_until_expiry(date(2027, 3, 21)), 10);
        assert_eq!(item.days_until_expiry(date(2027, 3, 31)), 0);
        assert_eq!(item.days_until_expiry(date(2027, 4, 2)), -2);
    }

    #[test]
    fn antibiotics_always_require_prescription() {
        let item = item_with_stock(1);
        assert!(item.requires_prescription());
        assert_eq!(item.kind(), ItemKind::Antibiotic);
    }

    #[test]
    fn prescription_token_must_have_content() {
        let item = item_with_stock(1);
        assert!(item.validate_prescription("RX-123"));
        assert!(item.validate_prescription("  RX "));
        assert!(!item.validate_prescription(""));
        assert!(!item.validate_prescription(" \t\n"));
    }

    #[test]
    fn describe_is_flat_and_fully_populated() {
        let item = item_with_stock(4);
        let json = serde_json::to_value(item.describe()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["tipo"], "antibiotico");
        assert_eq!(obj["tipo_nombre"], "Antibiótico");
        assert_eq!(obj["codigo"], "AB1");
        assert_eq!(obj["vencimiento"], "2027-03-31");
        assert_eq!(obj["stock"], 4);
        assert_eq!(obj["via_administracion"], "oral");
        assert_eq!(obj["requiere_receta"], true);
        assert_eq!(obj.len(), 13);
        assert!(obj.values().all(|v| !v.is_null()));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: accepted adjustments land exactly on `stock + delta`.
            #[test]
            fn accepted_adjustment_adds_delta(
                stock in 0i64..1_000_000,
                delta in -1_000_000i64..1_000_000
            ) {
                prop_assume!(stock + delta >= 0);
                let mut item = item_with_stock(stock);

                prop_assert_eq!(item.adjust_stock(delta).unwrap(), stock + delta);
                prop_assert_eq!(item.stock(), stock + delta);
            }

            /// Property: rejected adjustments leave the item untouched.
            #[test]
            fn rejected_adjustment_is_a_no_op(
                stock in 0i64..1_000_000,
                delta in -2_000_000i64..0
            ) {
                prop_assume!(stock + delta < 0);
                let mut item = item_with_stock(stock);
                let before = item.clone();

                prop_assert!(item.adjust_stock(delta).is_err());
                prop_assert_eq!(&item, &before);
            }

            /// Property: within-expiry holds exactly for dates strictly before expiry.
            #[test]
            fn within_expiry_iff_before(offset in -400i64..400) {
                let item = item_with_stock(1);
                let reference = item.expiry() + chrono::Duration::days(offset);

                prop_assert_eq!(item.is_within_expiry(reference), offset < 0);
            }
        }
    }
}
