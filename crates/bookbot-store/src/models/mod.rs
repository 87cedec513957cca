pub mod book;
pub mod row;

pub use book::{BookRecord, MAX_STAR_RATING};
pub use row::{QueryOutcome, Row, NO_ROWS_FOUND};
