//! Error types for fl-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Constraint violation: primary key, unique, not null, check, foreign key (D004)
    #[error("[D004] Constraint violated: {0}")]
    ConstraintViolation(String),

    /// Transaction begin/commit/rollback failed (D005)
    #[error("[D005] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// A result column did not hold the expected type (D007)
    #[error("[D007] Unexpected value in column {index}: expected {expected}, found {found}")]
    UnexpectedValue {
        index: usize,
        expected: &'static str,
        found: String,
    },
}

impl DbError {
    /// Whether this error reports a violated constraint rather than an
    /// infrastructure failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }

    /// Whether this error reports that an object being created already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            DbError::ExecutionError(msg) | DbError::TransactionError(msg) => {
                msg.contains("already exists")
            }
            _ => false,
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for engine
        // errors, so classification goes by the error class prefix DuckDB
        // puts in the message.
        let msg = err.to_string();
        if msg.contains("Constraint Error") {
            DbError::ConstraintViolation(msg)
        } else if msg.contains("TransactionContext Error") {
            DbError::TransactionError(msg)
        } else if (msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || msg.contains("Catalog Error") && msg.contains("Table"))
            && (msg.contains("does not exist") || msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
