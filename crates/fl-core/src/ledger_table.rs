//! Validated ledger table name.
//!
//! The ledger table name is caller-supplied configuration with no default.
//! It is interpolated into DDL/DML, so it is restricted to one or two
//! identifier segments of ASCII alphanumerics and underscores.

use crate::error::{CoreError, CoreResult};
use crate::newtype_string::define_validated_string;
use crate::sql_utils::quote_qualified;

define_validated_string! {
    /// Name of the table that records applied migrations, optionally
    /// schema-qualified (`meta.migration`).
    pub struct LedgerTableName;
    validate = validate_ledger_table;
}

fn validate_ledger_table(name: &str) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::InvalidLedgerTable {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > 2 {
        return Err(invalid("expected `table` or `schema.table`"));
    }
    for segment in segments {
        if segment.is_empty() {
            return Err(invalid("empty identifier segment"));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid(
                "must contain only alphanumeric characters and underscores",
            ));
        }
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid("identifiers must not start with a digit"));
        }
    }
    Ok(())
}

impl LedgerTableName {
    /// Schema component, if the name is qualified.
    pub fn schema(&self) -> Option<&str> {
        self.as_str().rsplit_once('.').map(|(schema, _)| schema)
    }

    /// Unqualified table component.
    pub fn table(&self) -> &str {
        self.as_str()
            .rsplit_once('.')
            .map_or(self.as_str(), |(_, table)| table)
    }

    /// The name quoted for direct use in SQL text.
    pub fn quoted(&self) -> String {
        quote_qualified(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_table_name() {
        let name = LedgerTableName::parse("migration").unwrap();
        assert_eq!(name.schema(), None);
        assert_eq!(name.table(), "migration");
        assert_eq!(name.quoted(), r#""migration""#);
    }

    #[test]
    fn test_schema_qualified_name() {
        let name = LedgerTableName::parse("meta.schema_migrations").unwrap();
        assert_eq!(name.schema(), Some("meta"));
        assert_eq!(name.table(), "schema_migrations");
        assert_eq!(name.quoted(), r#""meta"."schema_migrations""#);
    }

    #[test]
    fn test_rejects_unsafe_names() {
        for bad in [
            "",
            "a.b.c",
            ".migration",
            "migration.",
            "migration; drop table x",
            "1migration",
            "mi-gration",
        ] {
            assert!(
                matches!(
                    LedgerTableName::parse(bad),
                    Err(CoreError::InvalidLedgerTable { .. })
                ),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_deserialize_runs_validation() {
        assert!(serde_yaml::from_str::<LedgerTableName>("migration").is_ok());
        assert!(serde_yaml::from_str::<LedgerTableName>("\"bad name\"").is_err());
    }
}
