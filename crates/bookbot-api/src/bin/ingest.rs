//! Catalog loader.
//!
//! Reads a JSON array of book records and appends them to the SQLite
//! catalog, creating the file and table when missing.
//!
//! Usage:
//! ```bash
//! cargo run --bin bookbot-ingest -- data/books.json
//! cargo run --bin bookbot-ingest -- --db /tmp/books.db data/books.json -v
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bookbot_api::{config::LoggingConfig, telemetry::init_logging};
use bookbot_store::{BookRecord, BookWriter};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "bookbot-ingest",
    about = "Load book records into the bookbot catalog",
    long_about = "Create the books table if needed and insert every record from a JSON array. \
                  Running it twice on the same file inserts the records twice."
)]
struct IngestArgs {
    /// Catalog database file
    #[arg(long, env = "DATABASE_PATH", default_value = "data/books_data.db")]
    db: PathBuf,

    /// JSON file holding an array of book records
    records: PathBuf,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = IngestArgs::parse();

    let _log_guard = init_logging(&LoggingConfig {
        level: if args.verbose { "debug" } else { "info" }.to_string(),
        ..LoggingConfig::default()
    });

    let raw = std::fs::read_to_string(&args.records)
        .with_context(|| format!("Failed to read {}", args.records.display()))?;
    let records: Vec<BookRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of book records", args.records.display()))?;
    info!(records = records.len(), source = %args.records.display(), "Parsed records");

    let mut writer = BookWriter::open(&args.db)
        .with_context(|| format!("Failed to open {}", args.db.display()))?;
    writer.create_schema_if_absent()?;

    let inserted = writer.insert_records(&records)?;
    let total = writer.count()?;

    info!(inserted, total, db = %args.db.display(), "Catalog updated");

    Ok(())
}
