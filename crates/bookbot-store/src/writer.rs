use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;

use crate::error::Result;
use crate::models::BookRecord;
use crate::schema::{COUNT_BOOKS_SQL, CREATE_BOOKS_TABLE_SQL, INSERT_BOOK_SQL};

/// Ingestion-side connection
///
/// Owns a single read-write connection for the duration of a batch import.
/// Never used while chat traffic is being served.
pub struct BookWriter {
    conn: Connection,
}

impl BookWriter {
    /// Open or create the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory database (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn create_schema_if_absent(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_BOOKS_TABLE_SQL)?;
        Ok(())
    }

    /// Insert all records in one exclusive transaction
    ///
    /// Every record is validated first; one bad record rejects the batch.
    /// There is no dedup key, so importing the same file twice stores the
    /// rows twice.
    pub fn insert_records(&mut self, records: &[BookRecord]) -> Result<usize> {
        for record in records {
            record.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Exclusive)?;
        {
            let mut stmt = tx.prepare_cached(INSERT_BOOK_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.title,
                    record.price,
                    record.star_rating,
                    record.availability,
                    record.description,
                    record.category,
                    record.quantity,
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(inserted = records.len(), "Inserted book records");
        Ok(records.len())
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(COUNT_BOOKS_SQL, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
