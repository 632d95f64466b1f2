use serde::Deserialize;

use farmacia_core::{DomainError, DomainResult, ItemCode};
use farmacia_inventory::{ItemRecord, parse_expiry};

// -------------------------
// Request DTOs
// -------------------------

/// Intake form (`application/x-www-form-urlencoded`).
///
/// Every field is optional at the wire level so a missing field becomes a
/// validation message rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct NewAntibioticForm {
    pub codigo: Option<String>,
    pub nombre_comercial: Option<String>,
    pub nombre_generico: Option<String>,
    pub laboratorio: Option<String>,
    pub vencimiento: Option<String>,
    pub lote: Option<String>,
    pub presentacion: Option<String>,
    pub precio: Option<String>,
    pub stock: Option<String>,
    pub via_administracion: Option<String>,
}

impl NewAntibioticForm {
    /// Coerce form text into a record. Field rules (non-empty, non-negative) are
    /// checked again by the store on insert.
    pub fn into_record(self) -> DomainResult<ItemRecord> {
        let code = ItemCode::new(required("codigo", self.codigo)?)?;
        let expiry = parse_expiry(&required("vencimiento", self.vencimiento)?)?;

        let raw_price = required("precio", self.precio)?;
        let price: f64 = raw_price.trim().parse().map_err(|_| {
            DomainError::validation(format!("precio must be a number (got '{raw_price}')"))
        })?;

        let raw_stock = required("stock", self.stock)?;
        let stock: i64 = raw_stock.trim().parse().map_err(|_| {
            DomainError::validation(format!("stock must be an integer (got '{raw_stock}')"))
        })?;

        let record = ItemRecord {
            code,
            commercial_name: required("nombre_comercial", self.nombre_comercial)?,
            generic_name: required("nombre_generico", self.nombre_generico)?,
            manufacturer: required("laboratorio", self.laboratorio)?,
            expiry,
            batch: required("lote", self.lote)?,
            dosage_form: required("presentacion", self.presentacion)?,
            price,
            stock,
            route: required("via_administracion", self.via_administracion)?,
        };
        record.validate()?;
        Ok(record)
    }
}

fn required(field: &str, value: Option<String>) -> DomainResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DomainError::validation(format!("missing field '{field}'"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub nombre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Low-stock threshold override.
    pub umbral: Option<i64>,
    /// Expiry window override, in days.
    pub dias: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionRequest {
    #[serde(default)]
    pub receta: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> NewAntibioticForm {
        NewAntibioticForm {
            codigo: Some("AB1".into()),
            nombre_comercial: Some("Amoxil".into()),
            nombre_generico: Some("Amoxicilina".into()),
            laboratorio: Some("GSK".into()),
            vencimiento: Some("2027-03-31".into()),
            lote: Some("L-001".into()),
            presentacion: Some("Cápsulas".into()),
            precio: Some("12.50".into()),
            stock: Some("10".into()),
            via_administracion: Some("oral".into()),
        }
    }

    #[test]
    fn complete_form_becomes_record() {
        let record = full_form().into_record().unwrap();
        assert_eq!(record.code.as_str(), "AB1");
        assert_eq!(record.price, 12.5);
        assert_eq!(record.stock, 10);
        assert_eq!(record.expiry.to_string(), "2027-03-31");
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let mut form = full_form();
        form.precio = Some("doce".into());
        let err = form.into_record().unwrap_err();
        assert!(err.to_string().contains("precio"));
    }

    #[test]
    fn fractional_stock_is_rejected() {
        let mut form = full_form();
        form.stock = Some("2.5".into());
        assert!(matches!(form.into_record(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn missing_field_is_named() {
        let mut form = full_form();
        form.lote = None;
        let err = form.into_record().unwrap_err();
        assert_eq!(err, DomainError::validation("missing field 'lote'"));
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut form = full_form();
        form.stock = Some("-1".into());
        assert!(form.into_record().is_err());
    }
}
