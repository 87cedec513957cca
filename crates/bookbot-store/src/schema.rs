//! SQL for the `books` table.

/// Table definition. Also shown to the model so it can write queries.
pub const CREATE_BOOKS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    price REAL NOT NULL,
    star_rating INTEGER NOT NULL,
    availability TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    quantity INTEGER NOT NULL
)";

pub const INSERT_BOOK_SQL: &str = "INSERT INTO books \
    (title, price, star_rating, availability, description, category, quantity) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub const COUNT_BOOKS_SQL: &str = "SELECT COUNT(*) FROM books";

/// Columns in declaration order
pub const BOOK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "price",
    "star_rating",
    "availability",
    "description",
    "category",
    "quantity",
];
