//! Sync keys: the whole database as one pasteable string.
//!
//! A key is the JSON export, gzipped and encoded as URL-safe base64.
//! Applying a key replaces all local content.

use crate::db::{DatabaseExport, DbError, ExportRepository};
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncKeyError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("failed to serialize database: {0}")]
    Json(#[from] serde_json::Error),

    #[error("compression failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid sync key: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Serialize every table into a sync key.
pub fn generate_sync_key<R: ExportRepository>(repo: &R) -> Result<String, SyncKeyError> {
    let export = repo.export_all()?;
    let json = serde_json::to_string(&export)?;
    let key = compress_and_encode(&json)?;

    tracing::info!(
        texts = export.texts.len(),
        words = export.words.len(),
        bytes = key.len(),
        "generated sync key"
    );
    Ok(key)
}

/// Replace the database content with the content of a sync key.
pub fn apply_sync_key<R: ExportRepository>(repo: &R, key: &str) -> Result<DatabaseExport, SyncKeyError> {
    let json = decode_and_decompress(key)?;
    let export: DatabaseExport = serde_json::from_str(&json)?;
    repo.import_all(&export)?;
    Ok(export)
}

fn compress_and_encode(data: &str) -> Result<String, SyncKeyError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(base64::engine::general_purpose::URL_SAFE.encode(compressed))
}

fn decode_and_decompress(encoded: &str) -> Result<String, SyncKeyError> {
    let compressed = base64::engine::general_purpose::URL_SAFE.decode(encoded.trim())?;
    let mut decoder = GzDecoder::new(&compressed[..]);
    let mut json = String::new();
    decoder.read_to_string(&mut json)?;
    Ok(json)
}
