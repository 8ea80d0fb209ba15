//! Strongly-typed migration name.
//!
//! A migration's name is its file name (e.g. `2024.01.15T09.30.00.users.sql`)
//! and doubles as the ledger primary key and the sort key that fixes apply
//! order, so the ordering derived on the newtype is plain string ordering.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_validated_string;

define_validated_string! {
    /// Name of a migration, unique within a migration set.
    ///
    /// Must be non-empty, free of surrounding whitespace and control
    /// characters, and must not contain path separators.
    pub struct MigrationName;
    validate = validate_migration_name;
}

fn validate_migration_name(name: &str) -> CoreResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.trim() != name {
        "must not start or end with whitespace"
    } else if name.contains(['/', '\\']) {
        "must not contain path separators"
    } else if name.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };
    Err(CoreError::InvalidMigrationName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
