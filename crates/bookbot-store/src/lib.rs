//! SQLite-backed book catalog.
//!
//! - [`BookStore`]: read-only query path used while answering questions
//! - [`BookWriter`]: ingestion path that creates the schema and loads records

pub mod error;
pub mod models;
pub mod reader;
pub mod schema;
pub mod writer;

pub use error::{Result, StoreError};
pub use models::{BookRecord, QueryOutcome, Row, NO_ROWS_FOUND};
pub use reader::BookStore;
pub use writer::BookWriter;
