//! Ledger store: CRUD over the table recording applied migrations.
//!
//! Table layout (stable across versions):
//!
//! ```sql
//! CREATE TABLE <ledger> (
//!     name        VARCHAR PRIMARY KEY,
//!     fingerprint VARCHAR NOT NULL,
//!     applied_at  TIMESTAMP NOT NULL
//! )
//! ```
//!
//! The store holds no state beyond the datastore handle and table name, so
//! every call re-reads the table, and every statement runs inside whatever
//! transaction the handle has open.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use fl_core::LedgerTableName;
use fl_db::{Database, DbError, Row, SqlValue};
use serde::Serialize;

/// Format used to bind `applied_at` as text; cast to TIMESTAMP in SQL.
const TIMESTAMP_PARAM_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One row of the ledger table
///
/// `name` is kept as stored rather than validated: a row written by another
/// tool under a name no definition can have is still listed, as an orphan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub name: String,
    pub fingerprint: String,
    pub applied_at: DateTime<Utc>,
}

impl LedgerRecord {
    /// Record stamped with the current time
    pub fn now(name: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fingerprint: fingerprint.into(),
            applied_at: Utc::now(),
        }
    }

    fn from_row(row: &Row) -> EngineResult<Self> {
        let name = row.text(0)?.to_string();
        let fingerprint = row.text(1)?.to_string();
        let micros = row.int(2)?;
        let applied_at =
            DateTime::from_timestamp_micros(micros).ok_or(DbError::UnexpectedValue {
                index: 2,
                expected: "timestamp in range",
                found: micros.to_string(),
            })?;
        Ok(Self {
            name,
            fingerprint,
            applied_at,
        })
    }
}

/// Ledger operations over one datastore handle
pub struct LedgerStore<'a> {
    db: &'a dyn Database,
    table: &'a LedgerTableName,
}

impl<'a> LedgerStore<'a> {
    pub fn new(db: &'a dyn Database, table: &'a LedgerTableName) -> Self {
        Self { db, table }
    }

    /// The configured table name
    pub fn table(&self) -> &LedgerTableName {
        self.table
    }

    /// Create the ledger table (and its schema) if absent.
    ///
    /// Idempotent. Losing a creation race to another process counts as
    /// success.
    pub async fn ensure_table(&self) -> EngineResult<()> {
        if let Some(schema) = self.table.schema() {
            tolerate_existing(self.db.create_schema_if_not_exists(schema).await)?;
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                name VARCHAR PRIMARY KEY,
                fingerprint VARCHAR NOT NULL,
                applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp
            )",
            self.table.quoted()
        );
        tolerate_existing(self.db.execute_batch(&sql).await)?;
        log::debug!("Ledger table {} ready", self.table);
        Ok(())
    }

    /// All records, ascending by name
    pub async fn list_records(&self) -> EngineResult<Vec<LedgerRecord>> {
        self.select("ORDER BY name", &[]).await
    }

    /// All records, most recently applied first
    pub async fn list_records_by_applied_order(&self) -> EngineResult<Vec<LedgerRecord>> {
        self.select("ORDER BY applied_at DESC, name DESC", &[]).await
    }

    /// The record for `name`, if any
    pub async fn find_record(&self, name: &str) -> EngineResult<Option<LedgerRecord>> {
        let mut records = self
            .select("WHERE name = ?", &[SqlValue::from(name)])
            .await?;
        Ok(records.pop())
    }

    /// Insert a record; [`EngineError::DuplicateRecord`] if the name exists
    pub async fn insert_record(&self, record: &LedgerRecord) -> EngineResult<()> {
        if self.find_record(&record.name).await?.is_some() {
            return Err(EngineError::DuplicateRecord {
                name: record.name.to_string(),
            });
        }
        let sql = format!(
            "INSERT INTO {} (name, fingerprint, applied_at) VALUES (?, ?, CAST(? AS TIMESTAMP))",
            self.table.quoted()
        );
        let params = [
            SqlValue::from(record.name.as_str()),
            SqlValue::from(record.fingerprint.as_str()),
            SqlValue::Text(
                record
                    .applied_at
                    .format(TIMESTAMP_PARAM_FORMAT)
                    .to_string(),
            ),
        ];
        match self.db.execute(&sql, &params).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_constraint_violation() => Err(EngineError::DuplicateRecord {
                name: record.name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the record for `name`; [`EngineError::NotFound`] if absent
    pub async fn delete_record(&self, name: &str) -> EngineResult<()> {
        let sql = format!("DELETE FROM {} WHERE name = ?", self.table.quoted());
        let affected = self.db.execute(&sql, &[SqlValue::from(name)]).await?;
        if affected == 0 {
            return Err(EngineError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Replace the fingerprint for `name`; [`EngineError::NotFound`] if absent
    pub async fn update_fingerprint(&self, name: &str, fingerprint: &str) -> EngineResult<()> {
        let sql = format!(
            "UPDATE {} SET fingerprint = ? WHERE name = ?",
            self.table.quoted()
        );
        let affected = self
            .db
            .execute(&sql, &[SqlValue::from(fingerprint), SqlValue::from(name)])
            .await?;
        if affected == 0 {
            return Err(EngineError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    async fn select(&self, tail: &str, params: &[SqlValue]) -> EngineResult<Vec<LedgerRecord>> {
        let sql = format!(
            "SELECT name, fingerprint, epoch_us(applied_at) FROM {} {}",
            self.table.quoted(),
            tail
        );
        let rows = self.db.query(&sql, params).await?;
        rows.iter().map(LedgerRecord::from_row).collect()
    }
}

fn tolerate_existing(result: Result<(), DbError>) -> Result<(), DbError> {
    match result {
        Err(e) if e.is_already_exists() => {
            log::debug!("Ignoring concurrent creation: {e}");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
