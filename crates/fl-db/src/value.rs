//! Backend-neutral parameter and result values.

use crate::error::{DbError, DbResult};
use std::fmt;

/// A bound parameter or a result cell
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "null"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(n) => write!(f, "{n}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

/// One result row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub Vec<SqlValue>);

impl Row {
    /// Number of columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw cell at `index`
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.0.get(index)
    }

    /// Text cell at `index`
    pub fn text(&self, index: usize) -> DbResult<&str> {
        match self.cell(index)? {
            SqlValue::Text(s) => Ok(s),
            other => Err(unexpected(index, "text", other)),
        }
    }

    /// Integer cell at `index`; numeric text is accepted
    pub fn int(&self, index: usize) -> DbResult<i64> {
        match self.cell(index)? {
            SqlValue::Int(n) => Ok(*n),
            SqlValue::Text(s) => s
                .parse()
                .map_err(|_| unexpected(index, "int", &SqlValue::Text(s.clone()))),
            other => Err(unexpected(index, "int", other)),
        }
    }

    fn cell(&self, index: usize) -> DbResult<&SqlValue> {
        self.0.get(index).ok_or(DbError::UnexpectedValue {
            index,
            expected: "a column",
            found: format!("{} columns", self.0.len()),
        })
    }
}

fn unexpected(index: usize, expected: &'static str, found: &SqlValue) -> DbError {
    DbError::UnexpectedValue {
        index,
        expected,
        found: format!("{} ({})", found.type_name(), found),
    }
}
