//! SQLite schema definitions.

/// Complete schema for the reader database.
pub const SCHEMA: &str = r#"
-- Imported texts
CREATE TABLE IF NOT EXISTS texts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL
);

-- Global vocabulary
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE,
    status TEXT DEFAULT 'new',
    meaning TEXT,
    stability REAL,
    difficulty REAL,
    last_review_date TEXT,
    next_review_date TEXT
);

-- Words occurring in each text
CREATE TABLE IF NOT EXISTS text_words (
    text_id INTEGER NOT NULL REFERENCES texts(id),
    word_id INTEGER NOT NULL REFERENCES words(id),
    PRIMARY KEY (text_id, word_id)
);

-- Dictionary locale (single row)
CREATE TABLE IF NOT EXISTS user_preferences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    country_code TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_words_due ON words(status, next_review_date);
CREATE INDEX IF NOT EXISTS idx_text_words_word ON text_words(word_id);
"#;
