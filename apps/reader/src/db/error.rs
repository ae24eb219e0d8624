//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("text not found: {0}")]
    TextNotFound(i64),

    #[error("word not found: {0}")]
    WordNotFound(i64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
