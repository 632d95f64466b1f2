//! SQLite-backed record store.
//!
//! Every operation opens its own connection, runs its statement and closes the
//! connection again, whatever the outcome. There is no pool and no connection
//! reuse across operations; concurrent writers are serialized by SQLite itself.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, FromRow, Row};

use farmacia_core::{DomainError, ItemCode};
use farmacia_inventory::ItemRecord;

use super::r#trait::{InventoryStore, StoreError, stock_out_of_range};

const SELECT_COLUMNS: &str = r#"
    SELECT
        codigo,
        nombre_comercial,
        nombre_generico,
        laboratorio,
        vencimiento,
        lote,
        presentacion,
        precio,
        stock,
        via_administracion
    FROM antibiotico
"#;

/// Row shape of the `antibiotico` table (surrogate `id` left out).
#[derive(Debug, FromRow)]
struct AntibioticRow {
    codigo: String,
    nombre_comercial: String,
    nombre_generico: String,
    laboratorio: String,
    vencimiento: NaiveDate,
    lote: String,
    presentacion: String,
    precio: f64,
    stock: i64,
    via_administracion: String,
}

impl TryFrom<AntibioticRow> for ItemRecord {
    type Error = DomainError;

    fn try_from(row: AntibioticRow) -> Result<Self, Self::Error> {
        Ok(ItemRecord {
            code: ItemCode::new(row.codigo)?,
            commercial_name: row.nombre_comercial,
            generic_name: row.nombre_generico,
            manufacturer: row.laboratorio,
            expiry: row.vencimiento,
            batch: row.lote,
            dosage_form: row.presentacion,
            price: row.precio,
            stock: row.stock,
            route: row.via_administracion,
        })
    }
}

fn rows_to_records(rows: Vec<AntibioticRow>) -> Result<Vec<ItemRecord>, StoreError> {
    rows.into_iter()
        .map(|row| ItemRecord::try_from(row).map_err(StoreError::from))
        .collect()
}

/// SQLite store with per-operation connections.
#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    options: SqliteConnectOptions,
}

impl SqliteInventoryStore {
    /// Store backed by the database file at `path` (created if missing).
    pub fn open(path: impl AsRef<Path>) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self { options }
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        Ok(self.options.connect().await?)
    }
}

/// Close `conn` and hand back the statement outcome.
///
/// The statement error wins over a close error.
async fn release<T>(
    conn: SqliteConnection,
    outcome: Result<T, StoreError>,
) -> Result<T, StoreError> {
    let closed = conn.close().await;
    let value = outcome?;
    closed?;
    Ok(value)
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn initialize_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let outcome = sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS antibiotico (
                id                 INTEGER PRIMARY KEY AUTOINCREMENT,
                codigo             TEXT UNIQUE NOT NULL,
                nombre_comercial   TEXT NOT NULL,
                nombre_generico    TEXT NOT NULL,
                laboratorio        TEXT NOT NULL,
                vencimiento        TEXT NOT NULL,
                lote               TEXT NOT NULL,
                presentacion       TEXT NOT NULL,
                precio             REAL NOT NULL,
                stock              INTEGER NOT NULL,
                via_administracion TEXT NOT NULL
            )
            "#,
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(StoreError::from);

        release(conn, outcome).await
    }

    async fn insert(&self, record: &ItemRecord) -> Result<(), StoreError> {
        record.validate()?;

        let mut conn = self.connect().await?;
        let outcome = sqlx::query(
            r#"
            INSERT INTO antibiotico (
                codigo, nombre_comercial, nombre_generico, laboratorio,
                vencimiento, lote, presentacion, precio, stock, via_administracion
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.commercial_name)
        .bind(&record.generic_name)
        .bind(&record.manufacturer)
        .bind(record.expiry)
        .bind(&record.batch)
        .bind(&record.dosage_form)
        .bind(record.price)
        .bind(record.stock)
        .bind(&record.route)
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::DuplicateCode(record.code.clone())
            }
            other => StoreError::from(other),
        });

        release(conn, outcome).await
    }

    async fn list_all(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let mut conn = self.connect().await?;
        let outcome = sqlx::query_as::<_, AntibioticRow>(SELECT_COLUMNS)
            .fetch_all(&mut conn)
            .await
            .map_err(StoreError::from)
            .and_then(rows_to_records);

        release(conn, outcome).await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ItemRecord>, StoreError> {
        // instr() keeps matching literal and case-sensitive, unlike LIKE.
        let sql = format!("{SELECT_COLUMNS} WHERE instr(nombre_comercial, ?) > 0");

        let mut conn = self.connect().await?;
        let outcome = sqlx::query_as::<_, AntibioticRow>(&sql)
            .bind(fragment)
            .fetch_all(&mut conn)
            .await
            .map_err(StoreError::from)
            .and_then(rows_to_records);

        release(conn, outcome).await
    }

    async fn find_by_code(&self, code: &ItemCode) -> Result<Option<ItemRecord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE codigo = ?");

        let mut conn = self.connect().await?;
        let outcome = sqlx::query_as::<_, AntibioticRow>(&sql)
            .bind(code.as_str())
            .fetch_optional(&mut conn)
            .await
            .map_err(StoreError::from)
            .and_then(|row| {
                row.map(ItemRecord::try_from)
                    .transpose()
                    .map_err(StoreError::from)
            });

        release(conn, outcome).await
    }

    async fn adjust_stock(&self, code: &ItemCode, delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let outcome = adjust_stock_on(&mut conn, code, delta).await;
        release(conn, outcome).await
    }
}

async fn adjust_stock_on(
    conn: &mut SqliteConnection,
    code: &ItemCode,
    delta: i64,
) -> Result<i64, StoreError> {
    // Single conditional update: the check and the write cannot interleave with
    // another writer. SQLite promotes an overflowing integer sum to REAL, so the
    // upper bound is checked without computing the sum.
    let updated = sqlx::query(
        r#"
        UPDATE antibiotico
        SET stock = stock + ?1
        WHERE codigo = ?2
          AND stock + ?1 >= 0
          AND (?1 <= 0 OR stock <= 9223372036854775807 - ?1)
        RETURNING stock
        "#,
    )
    .bind(delta)
    .bind(code.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = updated {
        return Ok(row.try_get::<i64, _>("stock")?);
    }

    let current = sqlx::query("SELECT stock FROM antibiotico WHERE codigo = ?")
        .bind(code.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match current {
        Some(row) => Err(stock_out_of_range(code, row.try_get("stock")?, delta)),
        None => Err(StoreError::Domain(DomainError::not_found())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn temp_store() -> (tempfile::TempDir, SqliteInventoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteInventoryStore::open(dir.path().join("farmacia.db"));
        (dir, store)
    }

    #[tokio::test]
    async fn satisfies_store_contract() {
        let (_dir, store) = temp_store();
        store.initialize_schema().await.unwrap();
        contract::exercise(store).await;
    }

    #[tokio::test]
    async fn schema_initialization_is_idempotent() {
        let (_dir, store) = temp_store();
        store.initialize_schema().await.unwrap();
        store
            .insert(&contract::record("AB1", "Amoxil", 3))
            .await
            .unwrap();

        store.initialize_schema().await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn records_survive_reopening_the_file() {
        let (dir, store) = temp_store();
        store.initialize_schema().await.unwrap();
        let record = contract::record("AB1", "Amoxil", 3);
        store.insert(&record).await.unwrap();

        let reopened = SqliteInventoryStore::open(dir.path().join("farmacia.db"));
        let found = reopened.find_by_code(&record.code).await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn expiry_is_stored_as_iso_text() {
        let (_dir, store) = temp_store();
        store.initialize_schema().await.unwrap();
        store
            .insert(&contract::record("AB1", "Amoxil", 3))
            .await
            .unwrap();

        let mut conn = store.connect().await.unwrap();
        let raw = sqlx::query_scalar::<_, String>("SELECT vencimiento FROM antibiotico")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        assert_eq!(raw, "2027-03-31");
    }

    #[tokio::test]
    async fn operations_fail_without_schema() {
        let (_dir, store) = temp_store();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
