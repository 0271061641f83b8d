//! One-shot extraction per book.
//!
//! Several generators may need the same expensive content scan. They share an
//! [`ExtractionGuard`]; the first request for a book records the book id and
//! runs the scan, later requests for that id are skipped. The set only grows.

use super::{GenerationContext, Handler};
use crate::book::Book;
use crate::error::{GenerateError, StorageError};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Content scan over a book. Implementations populate book-scoped data.
pub trait Extractor: Send + Sync {
    /// Human-readable name used in log lines
    fn name(&self) -> &str;

    fn extract(&self, book: &mut Book) -> Result<(), StorageError>;
}

/// Monotonic set of book ids already extracted by one subsystem
#[derive(Debug, Default)]
pub struct ExtractionGuard {
    seen: Mutex<HashSet<String>>,
}

impl ExtractionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.lock().contains(id)
    }

    pub fn add(&self, id: &str) {
        self.seen.lock().insert(id.to_string());
    }

    /// Record `id`; true when it was not seen before
    pub fn begin(&self, id: &str) -> bool {
        self.seen.lock().insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

/// Handler running an extractor behind an [`ExtractionGuard`]
#[derive(Clone)]
pub struct Guarded {
    extractor: Arc<dyn Extractor>,
    guard: Arc<ExtractionGuard>,
}

impl Guarded {
    /// Run `extractor` at most once per book id under `guard`
    pub fn new(extractor: Arc<dyn Extractor>, guard: Arc<ExtractionGuard>) -> Self {
        Self { extractor, guard }
    }
}

impl Handler for Guarded {
    fn handle(&self, _ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        // The id is recorded before scanning so a re-entrant request during
        // the scan is rejected as well.
        if !self.guard.begin(&book.id) {
            warn!(
                book = %book.id,
                extractor = self.extractor.name(),
                "Content already extracted, skipping scan"
            );
            return Ok(());
        }

        info!(book = %book.id, extractor = self.extractor.name(), "Scanning content");
        self.extractor
            .extract(book)
            .map_err(|source| GenerateError::Extraction {
                book: book.id.clone(),
                source,
            })
    }
}
