//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::scheduler::{BASE_DIFFICULTY, BASE_STABILITY};
use chrono::{DateTime, SecondsFormat, Utc};
use lexicon_core::{
    vocabulary_words, MeaningSavePolicy, StatusCounts, Text, VocabularyEntry, WordStatus,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

const WORD_COLUMNS: &str =
    "id, word, status, meaning, stability, difficulty, last_review_date, next_review_date";

/// Repository for text operations.
pub trait TextRepository {
    fn list_texts(&self) -> Result<Vec<Text>>;
    fn get_text(&self, id: i64) -> Result<Option<Text>>;
    fn create_text(&self, title: &str, content: &str) -> Result<Text>;
    fn update_text(&self, id: i64, title: &str, content: &str) -> Result<Text>;
    fn delete_text(&self, id: i64) -> Result<()>;
    fn get_text_with_words(&self, id: i64) -> Result<(Text, Vec<VocabularyEntry>)>;
    fn get_text_word_counts(&self, id: i64) -> Result<StatusCounts>;
}

/// Repository for vocabulary operations.
pub trait WordRepository {
    fn get_all_words(&self) -> Result<Vec<VocabularyEntry>>;
    fn get_word(&self, id: i64) -> Result<Option<VocabularyEntry>>;
    fn update_word_meaning(
        &self,
        id: i64,
        meaning: &str,
        policy: MeaningSavePolicy,
        now: DateTime<Utc>,
    ) -> Result<()>;
    fn mark_word_known(&self, id: i64) -> Result<()>;
    fn delete_word(&self, id: i64) -> Result<()>;
    fn next_due_word(&self, now: DateTime<Utc>) -> Result<Option<VocabularyEntry>>;
    fn save_review(&self, id: i64, update: &ReviewUpdate) -> Result<()>;
}

/// Repository for the dictionary locale.
pub trait PreferenceRepository {
    fn get_locale(&self) -> Result<Option<String>>;
    fn save_locale(&self, code: &str) -> Result<()>;
}

/// Repository for whole-database export and import.
pub trait ExportRepository {
    fn export_all(&self) -> Result<DatabaseExport>;
    fn import_all(&self, export: &DatabaseExport) -> Result<()>;
}

/// Scheduling fields written after a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub stability: f64,
    pub difficulty: f64,
    pub reviewed_at: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

/// Current export format version.
pub const EXPORT_VERSION: &str = "1.0";

/// Word row as exported. Columns are kept raw so exports round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: i64,
    pub word: String,
    pub status: Option<String>,
    pub meaning: Option<String>,
    pub stability: Option<f64>,
    pub difficulty: Option<f64>,
    pub last_review_date: Option<String>,
    pub next_review_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextWordLink {
    pub text_id: i64,
    pub word_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub id: i64,
    pub country_code: String,
}

/// Full database content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseExport {
    pub texts: Vec<Text>,
    pub words: Vec<WordRecord>,
    pub text_words: Vec<TextWordLink>,
    pub user_preferences: Vec<PreferenceRecord>,
    pub version: String,
}

/// Timestamp format used for every stored date.
///
/// Fixed width, so stored dates compare correctly as text.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    value.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<VocabularyEntry> {
        let status: Option<String> = row.get(2)?;
        Ok(VocabularyEntry {
            id: row.get(0)?,
            word: row.get(1)?,
            status: status
                .as_deref()
                .and_then(WordStatus::from_str)
                .unwrap_or_default(),
            meaning: row.get(3)?,
            stability: row.get::<_, Option<f64>>(4)?.unwrap_or(BASE_STABILITY),
            difficulty: row.get::<_, Option<f64>>(5)?.unwrap_or(BASE_DIFFICULTY),
            last_review_date: parse_timestamp(row.get(6)?),
            next_review_date: parse_timestamp(row.get(7)?),
        })
    }

    fn row_to_text(row: &rusqlite::Row) -> rusqlite::Result<Text> {
        Ok(Text {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
        })
    }
}

/// Link every vocabulary word of `content` to a text, creating missing words.
fn link_words(conn: &Connection, text_id: i64, content: &str) -> Result<usize> {
    let words = vocabulary_words(content);
    for word in &words {
        conn.execute(
            "INSERT OR IGNORE INTO words (word, status, stability, difficulty) VALUES (?1, 'new', ?2, ?3)",
            params![word, BASE_STABILITY, BASE_DIFFICULTY],
        )?;
        let word_id: i64 = conn.query_row(
            "SELECT id FROM words WHERE word = ?1",
            params![word],
            |row| row.get(0),
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO text_words (text_id, word_id) VALUES (?1, ?2)",
            params![text_id, word_id],
        )?;
    }
    Ok(words.len())
}

impl TextRepository for SqliteRepository {
    fn list_texts(&self) -> Result<Vec<Text>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, content FROM texts ORDER BY id")?;
        let texts = stmt
            .query_map([], Self::row_to_text)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(texts)
    }

    fn get_text(&self, id: i64) -> Result<Option<Text>> {
        self.conn
            .query_row(
                "SELECT id, title, content FROM texts WHERE id = ?1",
                params![id],
                Self::row_to_text,
            )
            .optional()
            .map_err(Into::into)
    }

    fn create_text(&self, title: &str, content: &str) -> Result<Text> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO texts (title, content) VALUES (?1, ?2)",
            params![title, content],
        )?;
        let id = tx.last_insert_rowid();
        let linked = link_words(&tx, id, content)?;
        tx.commit()?;

        tracing::debug!(text_id = id, words = linked, "created text");
        Ok(Text {
            id,
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    fn update_text(&self, id: i64, title: &str, content: &str) -> Result<Text> {
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE texts SET title = ?1, content = ?2 WHERE id = ?3",
            params![title, content, id],
        )?;
        if updated == 0 {
            return Err(DbError::TextNotFound(id));
        }
        tx.execute("DELETE FROM text_words WHERE text_id = ?1", params![id])?;
        let linked = link_words(&tx, id, content)?;
        tx.commit()?;

        tracing::debug!(text_id = id, words = linked, "updated text");
        Ok(Text {
            id,
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    fn delete_text(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM text_words WHERE text_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM texts WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DbError::TextNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn get_text_with_words(&self, id: i64) -> Result<(Text, Vec<VocabularyEntry>)> {
        let text = self.get_text(id)?.ok_or(DbError::TextNotFound(id))?;

        let mut stmt = self.conn.prepare(
            "SELECT w.id, w.word, w.status, w.meaning, w.stability, w.difficulty, w.last_review_date, w.next_review_date
             FROM words w
             JOIN text_words tw ON tw.word_id = w.id
             WHERE tw.text_id = ?1
             ORDER BY w.id",
        )?;
        let words = stmt
            .query_map(params![id], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((text, words))
    }

    fn get_text_word_counts(&self, id: i64) -> Result<StatusCounts> {
        self.conn
            .query_row(
                "SELECT
                    COALESCE(SUM(CASE WHEN w.status = 'new' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN w.status = 'seen' THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN w.status = 'known' THEN 1 ELSE 0 END), 0)
                 FROM text_words tw
                 JOIN words w ON tw.word_id = w.id
                 WHERE tw.text_id = ?1",
                params![id],
                |row| {
                    Ok(StatusCounts {
                        new: row.get(0)?,
                        seen: row.get(1)?,
                        known: row.get(2)?,
                    })
                },
            )
            .map_err(Into::into)
    }
}

impl WordRepository for SqliteRepository {
    fn get_all_words(&self) -> Result<Vec<VocabularyEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {WORD_COLUMNS} FROM words ORDER BY word"))?;
        let words = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(words)
    }

    fn get_word(&self, id: i64) -> Result<Option<VocabularyEntry>> {
        self.conn
            .query_row(
                &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
                params![id],
                Self::row_to_entry,
            )
            .optional()
            .map_err(Into::into)
    }

    fn update_word_meaning(
        &self,
        id: i64,
        meaning: &str,
        policy: MeaningSavePolicy,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let current = self.get_word(id)?.ok_or(DbError::WordNotFound(id))?;
        let status = policy.status_after_save(current.status);

        // A word with a fresh meaning is due right away. A deferred word keeps
        // an earlier due date and becomes seen on its first review.
        let next_review = match status {
            WordStatus::Seen => Some(now),
            WordStatus::New => Some(current.next_review_date.unwrap_or(now)),
            WordStatus::Known => current.next_review_date,
        }
        .map(format_timestamp);

        self.conn.execute(
            "UPDATE words SET meaning = ?1, status = ?2, next_review_date = ?3 WHERE id = ?4",
            params![meaning, status.as_str(), next_review, id],
        )?;
        Ok(())
    }

    fn mark_word_known(&self, id: i64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE words SET status = 'known', next_review_date = NULL WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(DbError::WordNotFound(id));
        }
        Ok(())
    }

    fn delete_word(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM text_words WHERE word_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM words WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DbError::WordNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn next_due_word(&self, now: DateTime<Utc>) -> Result<Option<VocabularyEntry>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {WORD_COLUMNS} FROM words
                     WHERE next_review_date <= ?1
                       AND (status = 'seen'
                            OR (COALESCE(status, 'new') = 'new'
                                AND TRIM(COALESCE(meaning, '')) != ''))
                     ORDER BY next_review_date ASC
                     LIMIT 1"
                ),
                params![format_timestamp(now)],
                Self::row_to_entry,
            )
            .optional()
            .map_err(Into::into)
    }

    fn save_review(&self, id: i64, update: &ReviewUpdate) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE words
             SET stability = ?1, difficulty = ?2, last_review_date = ?3, next_review_date = ?4,
                 status = CASE WHEN COALESCE(status, 'new') = 'new' THEN 'seen' ELSE status END
             WHERE id = ?5",
            params![
                update.stability,
                update.difficulty,
                format_timestamp(update.reviewed_at),
                format_timestamp(update.next_review),
                id
            ],
        )?;
        if updated == 0 {
            return Err(DbError::WordNotFound(id));
        }
        Ok(())
    }
}

impl PreferenceRepository for SqliteRepository {
    fn get_locale(&self) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT country_code FROM user_preferences LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn save_locale(&self, code: &str) -> Result<()> {
        // Single row: clear existing and insert new
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM user_preferences", [])?;
        tx.execute(
            "INSERT INTO user_preferences (country_code) VALUES (?1)",
            params![code],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Reformat an imported timestamp into the stored format.
fn normalize_timestamp(value: &Option<String>) -> Result<Option<String>> {
    value
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| format_timestamp(dt.with_timezone(&Utc)))
                .map_err(|e| DbError::InvalidData(format!("timestamp {s:?}: {e}")))
        })
        .transpose()
}

impl ExportRepository for SqliteRepository {
    fn export_all(&self) -> Result<DatabaseExport> {
        let texts = self.list_texts()?;

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {WORD_COLUMNS} FROM words ORDER BY id"))?;
        let words = stmt
            .query_map([], |row| {
                Ok(WordRecord {
                    id: row.get(0)?,
                    word: row.get(1)?,
                    status: row.get(2)?,
                    meaning: row.get(3)?,
                    stability: row.get(4)?,
                    difficulty: row.get(5)?,
                    last_review_date: row.get(6)?,
                    next_review_date: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT text_id, word_id FROM text_words ORDER BY text_id, word_id")?;
        let text_words = stmt
            .query_map([], |row| {
                Ok(TextWordLink {
                    text_id: row.get(0)?,
                    word_id: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, country_code FROM user_preferences ORDER BY id")?;
        let user_preferences = stmt
            .query_map([], |row| {
                Ok(PreferenceRecord {
                    id: row.get(0)?,
                    country_code: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(DatabaseExport {
            texts,
            words,
            text_words,
            user_preferences,
            version: EXPORT_VERSION.to_string(),
        })
    }

    fn import_all(&self, export: &DatabaseExport) -> Result<()> {
        // Validate before touching anything
        for word in &export.words {
            if let Some(status) = word.status.as_deref() {
                if WordStatus::from_str(status).is_none() {
                    return Err(DbError::InvalidData(format!(
                        "word {}: unknown status {status:?}",
                        word.id
                    )));
                }
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM text_words", [])?;
        tx.execute("DELETE FROM texts", [])?;
        tx.execute("DELETE FROM words", [])?;
        tx.execute("DELETE FROM user_preferences", [])?;

        for text in &export.texts {
            tx.execute(
                "INSERT INTO texts (id, title, content) VALUES (?1, ?2, ?3)",
                params![text.id, text.title, text.content],
            )?;
        }
        for word in &export.words {
            tx.execute(
                &format!("INSERT INTO words ({WORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    word.id,
                    word.word,
                    word.status,
                    word.meaning,
                    word.stability,
                    word.difficulty,
                    normalize_timestamp(&word.last_review_date)?,
                    normalize_timestamp(&word.next_review_date)?,
                ],
            )?;
        }
        for link in &export.text_words {
            tx.execute(
                "INSERT INTO text_words (text_id, word_id) VALUES (?1, ?2)",
                params![link.text_id, link.word_id],
            )?;
        }
        for preference in &export.user_preferences {
            tx.execute(
                "INSERT INTO user_preferences (id, country_code) VALUES (?1, ?2)",
                params![preference.id, preference.country_code],
            )?;
        }
        tx.commit()?;

        tracing::info!(
            texts = export.texts.len(),
            words = export.words.len(),
            "imported database"
        );
        Ok(())
    }
}
