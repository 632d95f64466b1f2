//! Persisted field set of a catalog entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmacia_core::{DomainError, DomainResult, ItemCode};

/// Canonical expiry representation (`YYYY-MM-DD`).
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Parse an expiry date in canonical form.
///
/// Anything that would not format back to the exact same text (e.g. `2026-1-5`)
/// is rejected so the stored representation always round-trips.
pub fn parse_expiry(raw: &str) -> DomainResult<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, EXPIRY_FORMAT)
        .map_err(|e| DomainError::validation(format!("vencimiento '{raw}': {e}")))?;
    if format_expiry(date) != raw {
        return Err(DomainError::validation(format!(
            "vencimiento '{raw}': expected YYYY-MM-DD"
        )));
    }
    Ok(date)
}

pub fn format_expiry(date: NaiveDate) -> String {
    date.format(EXPIRY_FORMAT).to_string()
}

/// Plain record as stored: every field of the entry, no behavior.
///
/// This is what the store reads and writes; hydration into an
/// [`InventoryItem`](crate::InventoryItem) happens above the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub code: ItemCode,
    pub commercial_name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub expiry: NaiveDate,
    pub batch: String,
    pub dosage_form: String,
    pub price: f64,
    pub stock: i64,
    pub route: String,
}

impl ItemRecord {
    /// Check required fields and numeric bounds.
    ///
    /// Reports the first offending field.
    pub fn validate(&self) -> DomainResult<()> {
        let required = [
            ("nombre_comercial", &self.commercial_name),
            ("nombre_generico", &self.generic_name),
            ("laboratorio", &self.manufacturer),
            ("lote", &self.batch),
            ("presentacion", &self.dosage_form),
            ("via_administracion", &self.route),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation(format!(
                "precio must be a non-negative number (got {})",
                self.price
            )));
        }

        if self.stock < 0 {
            return Err(DomainError::validation(format!(
                "stock cannot be negative (got {})",
                self.stock
            )));
        }

        Ok(())
    }
}
