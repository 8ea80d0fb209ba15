//! Error types for fl-engine

use crate::migration::Direction;
use fl_core::CoreError;
use fl_db::DbError;
use std::fmt;
use thiserror::Error;

/// Migration engine errors
///
/// Nothing here is retried automatically. Integrity errors are resolved by
/// `repair` once a content change is intentional; ledger consistency errors
/// (`DuplicateRecord`, `NotFound`) indicate a bug and are fatal.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Recorded and current state disagree (M001)
    #[error("[M001] Integrity check failed for {name}: {detail}")]
    Integrity { name: String, detail: IntegrityDetail },

    /// A migration's effect, or the transaction around it, failed (M002)
    #[error("[M002] Migration {name} ({direction}) failed: {source}")]
    Migration {
        name: String,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Ledger insert for a name that is already recorded (M003)
    #[error("[M003] Ledger already has a record for {name}")]
    DuplicateRecord { name: String },

    /// Ledger update or delete for a name that is not recorded (M004)
    #[error("[M004] Ledger has no record for {name}")]
    NotFound { name: String },

    /// Target names no known migration (M005)
    #[error("[M005] Unknown migration: {name}")]
    UnknownMigration { name: String },

    /// Down target is known but not currently applied (M006)
    #[error("[M006] Migration {name} is not applied, refusing to revert down to it")]
    TargetNotApplied { name: String },

    /// Revert requested for a migration without a down effect (M007)
    #[error("[M007] Migration {name} has no down migration")]
    MissingDownEffect { name: String },

    /// Two definitions share one name (M008)
    #[error("[M008] Duplicate migration name: {name}")]
    DuplicateDefinition { name: String },

    /// Migration file could not be read or written (M009)
    #[error("[M009] Failed to access migration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The migration source cannot scaffold new files (M010)
    #[error("[M010] This migration loader does not support creating migrations")]
    CreateUnsupported,

    /// Core error (names, config)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Datastore error outside any single migration
    #[error(transparent)]
    Db(#[from] DbError),
}

/// What an integrity check found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityDetail {
    /// Current content no longer hashes to the recorded fingerprint
    FingerprintMismatch { recorded: String, current: String },
    /// A migration about to be applied is already in the ledger
    AlreadyApplied,
}

impl fmt::Display for IntegrityDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityDetail::FingerprintMismatch { recorded, current } => write!(
                f,
                "ledger fingerprint {recorded} does not match current content fingerprint {current} (run repair if the edit is intentional)"
            ),
            IntegrityDetail::AlreadyApplied => write!(f, "already recorded in the ledger"),
        }
    }
}

impl EngineError {
    /// Attach the migration in progress to a bare datastore error.
    ///
    /// Every other variant is returned unchanged.
    pub(crate) fn during(self, name: &str, direction: Direction) -> Self {
        match self {
            EngineError::Db(source) => EngineError::Migration {
                name: name.to_string(),
                direction,
                source,
            },
            other => other,
        }
    }

    /// Whether this is an [`EngineError::Integrity`] error
    pub fn is_integrity(&self) -> bool {
        matches!(self, EngineError::Integrity { .. })
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
