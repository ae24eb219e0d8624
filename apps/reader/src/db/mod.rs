//! Local SQLite database operations.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{
    format_timestamp, DatabaseExport, ExportRepository, PreferenceRecord, PreferenceRepository,
    ReviewUpdate, SqliteRepository, TextRepository, TextWordLink, WordRecord, WordRepository,
    EXPORT_VERSION,
};
