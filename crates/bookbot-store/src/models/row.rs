use serde_json::{Map, Value};

use crate::error::Result;

/// Returned to the model in place of an empty row list.
pub const NO_ROWS_FOUND: &str = "No rows found for this sql query. This usually means there are no entries with the specified conditions.";

/// One result row: column name to value, in column order
pub type Row = Map<String, Value>;

/// Outcome of a successful read query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    /// The query ran and matched nothing
    Empty,
}

impl QueryOutcome {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        if rows.is_empty() {
            Self::Empty
        } else {
            Self::Rows(rows)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Rows(rows) => rows,
            Self::Empty => &[],
        }
    }

    /// Text handed back as the tool result
    pub fn to_tool_content(&self) -> Result<String> {
        match self {
            Self::Rows(rows) => Ok(serde_json::to_string(rows)?),
            Self::Empty => Ok(NO_ROWS_FOUND.to_string()),
        }
    }
}
