//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Row, SqlValue};
use async_trait::async_trait;
use duckdb::types::{ToSqlOutput, Value};
use duckdb::{params_from_iter, Connection, ToSql};
use fl_core::sql_utils::quote_ident;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
///
/// A single connection guarded by a mutex; an open transaction therefore
/// covers every call made through this backend until commit or rollback.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Null => Ok(ToSqlOutput::Owned(Value::Null)),
            SqlValue::Bool(b) => b.to_sql(),
            SqlValue::Int(n) => n.to_sql(),
            SqlValue::Float(x) => x.to_sql(),
            SqlValue::Text(s) => s.to_sql(),
        }
    }
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        log::debug!("execute: {sql}");
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(DbError::from)
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        log::debug!("execute batch: {sql}");
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Query synchronously, reading every cell into a [`SqlValue`].
    ///
    /// DuckDB panics on `stmt.column_count()` before execution, so the
    /// column count is read from each row's statement handle.
    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        log::debug!("query: {sql}");
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                Ok(Row((0..col_count).map(|i| read_cell(row, i)).collect()))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Run a transaction control statement
    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        log::debug!("{statement}");
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = name.rsplit_once('.').unwrap_or(("main", name));

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}

/// Read a cell, trying text, integer, float and bool in turn.
///
/// DuckDB integer columns do not convert to `Option<String>`, so each type
/// is attempted; NULL and unsupported types read as [`SqlValue::Null`].
fn read_cell(row: &duckdb::Row<'_>, idx: usize) -> SqlValue {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return SqlValue::Text(s);
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return SqlValue::Int(n);
    }
    if let Ok(Some(x)) = row.get::<_, Option<f64>>(idx) {
        return SqlValue::Float(x);
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return SqlValue::Bool(b);
    }
    SqlValue::Null
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.execute_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        self.query_sync(sql, params)
    }

    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema));
        self.execute_batch_sync(&sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl std::fmt::Debug for DuckDbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbBackend").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
