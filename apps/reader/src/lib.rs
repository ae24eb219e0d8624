//! Local reader: SQLite storage, the retention scheduler and sync keys
//! behind the lexicon engine.

pub mod config;
pub mod db;
pub mod render;
pub mod scheduler;
pub mod service;
pub mod sync_key;

pub use config::{ConfigError, ReaderConfig};
pub use db::{DbError, SqliteRepository};
pub use scheduler::RetentionScheduler;
pub use service::LocalStore;
pub use sync_key::{apply_sync_key, generate_sync_key, SyncKeyError};
