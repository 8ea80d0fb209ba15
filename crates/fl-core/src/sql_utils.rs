//! SQL identifier quoting utilities
//!
//! The ledger table name is the only identifier Fledge interpolates into SQL
//! text; everything else travels as bound parameters.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use fl_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("migration"), r#""migration""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// Splits on `.` and individually quotes each component.
///
/// # Examples
/// ```
/// use fl_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("migration"), r#""migration""#);
/// assert_eq!(quote_qualified("meta.migration"), r#""meta"."migration""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}
