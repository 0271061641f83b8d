//! Output writers
//!
//! Every generated file is written through [`write_if_stale`]: the caller
//! passes the book's last-modified time and the write is skipped when the file
//! on disk is already at least that new.

use crate::book::{Book, ExportWorkbook, GENERATED_DIR};
use crate::error::StorageError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a freshness-checked write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
}

/// `<content_root>/reference/<name>/<file>`; an empty name omits that segment
pub fn reference_path(content_root: &Path, name: &str, file: &str) -> PathBuf {
    let mut path = content_root.join(GENERATED_DIR);
    if !name.is_empty() {
        path.push(name);
    }
    path.push(file);
    path
}

/// True when `path` exists and was modified at or after `modified`
pub fn is_fresh(path: &Path, modified: DateTime<Utc>) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|existing| DateTime::<Utc>::from(existing) >= modified)
        .unwrap_or(false)
}

/// Write `bytes` to `path` unless the existing file is already fresh,
/// creating parent directories as needed.
pub fn write_if_stale(
    path: &Path,
    modified: DateTime<Utc>,
    bytes: &[u8],
) -> Result<WriteOutcome, StorageError> {
    if is_fresh(path, modified) {
        debug!(path = %path.display(), "Output is up to date, skipping write");
        return Ok(WriteOutcome::Skipped);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
    Ok(WriteOutcome::Written)
}

/// Persists a book's export workbook
pub trait ExportWriter: Send + Sync {
    fn write_export(
        &self,
        book: &Book,
        workbook: &ExportWorkbook,
    ) -> Result<WriteOutcome, StorageError>;
}

/// Writes the workbook as JSON to `<content_root>/reference/reference.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExportWriter;

impl JsonExportWriter {
    pub fn path_for(book: &Book) -> PathBuf {
        reference_path(book.content_root(), "", "reference.json")
    }
}

impl ExportWriter for JsonExportWriter {
    fn write_export(
        &self,
        book: &Book,
        workbook: &ExportWorkbook,
    ) -> Result<WriteOutcome, StorageError> {
        let bytes = serde_json::to_vec_pretty(workbook)?;
        write_if_stale(&Self::path_for(book), book.modified(), &bytes)
    }
}
