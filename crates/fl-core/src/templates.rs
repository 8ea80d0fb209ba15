//! Templates for newly scaffolded migrations.
//!
//! Both templates fail when executed, so a freshly created migration cannot be
//! applied or reverted by accident before it is filled in.

use chrono::{DateTime, Utc};

/// Body written to a new up migration
pub const SQL_UP: &str = "SELECT error('up migration not implemented');\n";

/// Body written to a new down migration
pub const SQL_DOWN: &str = "SELECT error('down migration not implemented');\n";

/// Timestamp prefix format; sorts lexicographically in creation order.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%dT%H.%M.%S";

/// Build the file name for a new migration, e.g.
/// `2022.08.25T12.51.47.add_users.sql`.
///
/// Returns `None` when `name` has no usable characters left after
/// sanitization.
pub fn migration_file_name(created_at: DateTime<Utc>, name: &str) -> Option<String> {
    let slug = sanitize(name);
    if slug.is_empty() {
        return None;
    }
    Some(format!(
        "{}.{}.sql",
        created_at.format(TIMESTAMP_FORMAT),
        slug
    ))
}

/// Keep `[A-Za-z0-9_-]`, map whitespace and dots to `_`, drop the rest.
fn sanitize(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_suffix(".sql").unwrap_or(name);
    name.chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            c if c.is_whitespace() || c == '.' => Some('_'),
            _ => None,
        })
        .collect()
}
