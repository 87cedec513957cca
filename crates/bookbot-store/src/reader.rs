use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, OpenFlags};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{Result, StoreError};
use crate::models::{QueryOutcome, Row};

/// Read path over the books database
///
/// Holds only the location; every query opens its own read-only connection,
/// so a `BookStore` can be shared between requests without locking.
#[derive(Debug, Clone)]
pub struct BookStore {
    path: PathBuf,
}

impl BookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_read_only(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Run one SQL statement and collect its rows
    ///
    /// Statements that would modify the database fail with
    /// `StoreError::PermissionDenied` and never reach the file.
    pub fn execute_read_query(&self, sql: &str) -> Result<QueryOutcome> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(StoreError::InvalidQuery("empty SQL statement".to_string()));
        }

        let start = Instant::now();
        let conn = self.open_read_only()?;

        // Every statement in the string is checked, so a write cannot hide
        // behind a leading SELECT.
        let mut batch = Batch::new(&conn, sql);
        let mut statements = Vec::new();
        while let Some(stmt) = batch.next().map_err(StoreError::from_sqlite)? {
            if !stmt.readonly() {
                return Err(StoreError::PermissionDenied(
                    "attempt to write a readonly database".to_string(),
                ));
            }
            statements.push(stmt);
        }

        if statements.len() > 1 {
            return Err(StoreError::InvalidQuery(
                "You can only execute one statement at a time.".to_string(),
            ));
        }
        let Some(mut stmt) = statements.pop() else {
            return Err(StoreError::InvalidQuery("no SQL statement found".to_string()));
        };

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([]).map_err(StoreError::from_sqlite)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::from_sqlite)? {
            let mut mapped = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                mapped.insert(name.clone(), to_json(row.get_ref(idx)?));
            }
            collected.push(mapped);
        }

        tracing::info!(
            rows = collected.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Executed read query"
        );

        Ok(QueryOutcome::from_rows(collected))
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<blob: {} bytes>", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_sql_is_rejected_before_opening() {
        let store = BookStore::new("does-not-exist.db");
        assert!(matches!(
            store.execute_read_query("   "),
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[test]
    fn comment_only_sql_has_no_statement() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.db");
        crate::BookWriter::open(&path)
            .unwrap()
            .create_schema_if_absent()
            .unwrap();

        let store = BookStore::new(&path);
        assert!(matches!(
            store.execute_read_query("-- just a comment"),
            Err(StoreError::InvalidQuery(_))
        ));
    }

    #[test]
    fn missing_database_is_a_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::new(dir.path().join("missing.db"));
        assert!(matches!(
            store.execute_read_query("SELECT 1"),
            Err(StoreError::Database(_))
        ));
        assert!(!dir.path().join("missing.db").exists());
    }

    #[test]
    fn sqlite_values_map_to_json() {
        assert_eq!(to_json(ValueRef::Null), Value::Null);
        assert_eq!(to_json(ValueRef::Integer(3)), Value::from(3));
        assert_eq!(to_json(ValueRef::Real(9.99)), Value::from(9.99));
        assert_eq!(to_json(ValueRef::Text(b"Classics")), Value::from("Classics"));
        assert_eq!(to_json(ValueRef::Blob(&[1, 2])), Value::from("<blob: 2 bytes>"));
    }
}
