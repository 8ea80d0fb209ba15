//! Database trait definition

use crate::error::DbResult;
use crate::value::{Row, SqlValue};
use async_trait::async_trait;

/// Transactional datastore the migration engine runs against
///
/// Transactions are connection-scoped: between `begin` and `commit` or
/// `rollback`, every call on the same handle participates in the open
/// transaction. Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement with bound parameters, returns affected rows
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query with bound parameters and collect every row
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
