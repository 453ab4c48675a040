//! `SQLite`-backed record source.
//!
//! # Schema
//!
//! One table per category, named after its slug, with one column per registry
//! key in registry order. Column affinity follows the column kind
//! (`INTEGER`, `REAL` for money, `TEXT` otherwise). Rows come back in
//! insertion order (`ORDER BY rowid`).

use crate::models::{ExportCategory, Record};
use crate::schema::{CategorySchema, HeaderRegistry};
use crate::storage::sqlite::{
    acquire_lock, cell_from_sql, cell_to_sql, configure_connection, quote_identifier,
    record_operation_metrics,
};
use crate::storage::traits::RecordSource;
use crate::{Error, Result};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

/// [`RecordSource`] reading category tables from a `SQLite` database.
///
/// The connection sits behind a `Mutex` because `rusqlite::Connection` is not
/// `Sync`; exports reading concurrently are serialized on it.
pub struct SqliteRecordSource {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
    registry: HeaderRegistry,
}

impl SqliteRecordSource {
    /// Opens (or creates) a database file and creates missing tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path).map_err(operation_failed("open_sqlite"))?;
        let source = Self {
            conn: Mutex::new(conn),
            db_path: Some(db_path),
            registry: HeaderRegistry::default(),
        };
        source.initialize()?;
        Ok(source)
    }

    /// Creates an in-memory database with empty tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(operation_failed("open_sqlite_in_memory"))?;
        let source = Self {
            conn: Mutex::new(conn),
            db_path: None,
            registry: HeaderRegistry::default(),
        };
        source.initialize()?;
        Ok(source)
    }

    /// Returns the database path (`None` for in-memory).
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Creates the table of every registry category if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if a `CREATE TABLE` fails.
    pub fn initialize(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);
        configure_connection(&conn)?;

        for category in self.registry.categories() {
            let schema = self.registry.schema(category)?;
            let columns = schema
                .columns
                .iter()
                .map(|c| format!("{} {}", quote_identifier(c.key), c.kind.sql_type()))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} ({columns})",
                quote_identifier(category.as_str())
            );
            conn.execute(&sql, [])
                .map_err(operation_failed("create_category_table"))?;
        }
        Ok(())
    }

    /// Appends one record to a category table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the record's keys differ from the
    /// registry columns, or [`Error::OperationFailed`] if the insert fails.
    pub fn insert(&self, category: ExportCategory, record: &Record) -> Result<()> {
        self.insert_all(category, std::slice::from_ref(record))
            .map(|_| ())
    }

    /// Appends records to a category table in one transaction.
    ///
    /// Either every record is stored or none is.
    ///
    /// # Errors
    ///
    /// Same as [`Self::insert`].
    #[instrument(skip(self, records), fields(operation = "insert", backend = "sqlite_source", category = %category, count = records.len()))]
    pub fn insert_all(&self, category: ExportCategory, records: &[Record]) -> Result<usize> {
        let start = Instant::now();
        let result = self.write_rows(category, records, false);
        record_operation_metrics("sqlite", "insert", start, status_of(&result));
        result
    }

    /// Replaces the contents of every table the other source serves.
    ///
    /// Categories the other source does not support are left untouched.
    /// Returns the number of records copied.
    ///
    /// # Errors
    ///
    /// Propagates the other source's read errors and this source's write
    /// errors; a failing category keeps its previous rows.
    #[instrument(skip(self, other), fields(operation = "seed", backend = "sqlite_source"))]
    pub fn seed_from(&self, other: &dyn RecordSource) -> Result<usize> {
        let mut copied = 0;
        for category in self.registry.categories() {
            if !other.supports(category) {
                continue;
            }
            let records = other.records(category)?;
            copied += self.write_rows(category, &records, true)?;
            tracing::debug!(category = %category, rows = records.len(), "Seeded category table");
        }
        tracing::info!(rows = copied, "Seeded SQLite record source");
        Ok(copied)
    }

    fn write_rows(&self, category: ExportCategory, records: &[Record], replace: bool) -> Result<usize> {
        let schema = self.registry.schema(category)?;
        let rows = records
            .iter()
            .map(|record| row_values(schema, record))
            .collect::<Result<Vec<_>>>()?;

        let table = quote_identifier(category.as_str());
        let columns = schema
            .columns
            .iter()
            .map(|c| quote_identifier(c.key))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=schema.columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");

        let mut conn = acquire_lock(&self.conn);
        let tx = conn
            .transaction()
            .map_err(operation_failed("begin_transaction"))?;
        if replace {
            tx.execute(&format!("DELETE FROM {table}"), [])
                .map_err(operation_failed("clear_category_table"))?;
        }
        {
            let mut stmt = tx.prepare(&sql).map_err(operation_failed("prepare_insert"))?;
            for values in &rows {
                stmt.execute(params_from_iter(values.iter()))
                    .map_err(operation_failed("insert_record"))?;
            }
        }
        tx.commit().map_err(operation_failed("commit_transaction"))?;
        Ok(rows.len())
    }

    fn select_all(&self, category: ExportCategory) -> Result<Vec<Record>> {
        let schema = self.registry.schema(category)?;
        let columns = schema
            .columns
            .iter()
            .map(|c| quote_identifier(c.key))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {columns} FROM {} ORDER BY rowid",
            quote_identifier(category.as_str())
        );

        let conn = acquire_lock(&self.conn);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(operation_failed("prepare_select"))?;
        let rows = stmt
            .query_map([], |row| {
                schema
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| Ok((column.key, cell_from_sql(row.get_ref(i)?, column.kind))))
                    .collect::<rusqlite::Result<Record>>()
            })
            .map_err(operation_failed("query_records"))?;
        let records = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(operation_failed("read_record_row"))?;
        Ok(records)
    }
}

impl RecordSource for SqliteRecordSource {
    #[instrument(skip(self), fields(operation = "records", backend = "sqlite_source", category = %category))]
    fn records(&self, category: ExportCategory) -> Result<Vec<Record>> {
        let start = Instant::now();
        let result = self.select_all(category);
        record_operation_metrics("sqlite", "records", start, status_of(&result));
        result
    }

    fn supports(&self, category: ExportCategory) -> bool {
        self.registry.schema(category).is_ok()
    }

    fn count(&self, category: ExportCategory) -> Result<usize> {
        self.registry.schema(category)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {}",
            quote_identifier(category.as_str())
        );
        let conn = acquire_lock(&self.conn);
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(operation_failed("count_records"))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn row_values(schema: &CategorySchema, record: &Record) -> Result<Vec<Value>> {
    if !record.keys().eq(schema.columns.iter().map(|c| c.key)) {
        return Err(Error::InvalidInput(format!(
            "record keys [{}] do not match the {} columns",
            record.keys().collect::<Vec<_>>().join(", "),
            schema.category
        )));
    }
    Ok(record.values().map(cell_to_sql).collect())
}

fn operation_failed(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |e| Error::OperationFailed {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}

const fn status_of<T>(result: &Result<T>) -> &'static str {
    if result.is_ok() { "success" } else { "error" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use crate::storage::MockRecordSource;
    use tempfile::TempDir;

    fn order(id: &str) -> Record {
        Record::new()
            .with("order_id", id)
            .with("customer", "Ivan Petrov")
            .with("service", "IPTV basic")
            .with("address", CellValue::Missing)
            .with("amount", CellValue::money_cents(123_456_750, "RUB"))
            .with("status", CellValue::display("New"))
            .with("created_on", CellValue::date(2024, 5, 2))
    }

    #[test]
    fn test_insert_and_read_back_in_order() {
        let source = SqliteRecordSource::in_memory().unwrap();
        source.insert(ExportCategory::Orders, &order("ORD-2")).unwrap();
        source.insert(ExportCategory::Orders, &order("ORD-1")).unwrap();

        let records = source.records(ExportCategory::Orders).unwrap();
        assert_eq!(records, vec![order("ORD-2"), order("ORD-1")]);
        assert_eq!(source.count(ExportCategory::Orders).unwrap(), 2);
    }

    #[test]
    fn test_empty_table_yields_no_records() {
        let source = SqliteRecordSource::in_memory().unwrap();
        assert!(source.records(ExportCategory::Calls).unwrap().is_empty());
    }

    #[test]
    fn test_insert_rejects_foreign_keys() {
        let source = SqliteRecordSource::in_memory().unwrap();
        let record = Record::new().with("order_id", "ORD-1");
        let err = source.insert(ExportCategory::Orders, &record).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(source.count(ExportCategory::Orders).unwrap(), 0);
    }

    #[test]
    fn test_seed_from_mock_matches_mock() {
        let mock = MockRecordSource::new();
        let source = SqliteRecordSource::in_memory().unwrap();
        let copied = source.seed_from(&mock).unwrap();

        let mut expected = 0;
        for category in ExportCategory::all() {
            let from_mock = mock.records(*category).unwrap();
            expected += from_mock.len();
            assert_eq!(source.records(*category).unwrap(), from_mock, "{category}");
        }
        assert_eq!(copied, expected);

        // seeding again replaces instead of appending
        assert_eq!(source.seed_from(&mock).unwrap(), expected);
        assert_eq!(
            source.count(ExportCategory::Orders).unwrap(),
            mock.count(ExportCategory::Orders).unwrap()
        );
    }

    #[test]
    fn test_file_database_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.db");
        {
            let source = SqliteRecordSource::new(&path).unwrap();
            source.insert(ExportCategory::Orders, &order("ORD-9")).unwrap();
            assert_eq!(source.db_path(), Some(path.as_path()));
        }
        let reopened = SqliteRecordSource::new(&path).unwrap();
        assert_eq!(
            reopened.records(ExportCategory::Orders).unwrap(),
            vec![order("ORD-9")]
        );
    }
}
