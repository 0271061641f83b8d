//! Book model
//!
//! A book is one documentation unit: a content directory, the ordered list of
//! generators to run over it, and the derived state those generators build up
//! (extracted tables, an optional export workbook).

mod export;
mod pdf;
mod shelf;

pub use export::{ExportWorkbook, Table};
pub use pdf::{Margins, PdfLayout, PrintOptions};
pub use shelf::Bookshelf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Directory under a book's content root that holds generated output
pub const GENERATED_DIR: &str = "reference";

/// Placeholder used in header/footer templates when a book has no title
pub const DEFAULT_TITLE_MARKUP: &str = "<span class='title'></span>";

/// Copyright block shown in generated front matter and PDF headers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookCopyright {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub sub_author: String,
    #[serde(default)]
    pub copyright: String,
}

/// Book entry as declared in configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Book ID, e.g. "bbc" or "6502"
    pub id: String,

    #[serde(flatten)]
    pub copyright: BookCopyright,

    /// Generators to run on this book, in order
    #[serde(default)]
    pub generate: Vec<String>,

    /// Per-book PDF layout overrides
    #[serde(default)]
    pub pdf: PdfLayout,
}

/// Runtime state of a book for one pipeline run
#[derive(Debug)]
pub struct Book {
    pub id: String,
    pub copyright: BookCopyright,
    pub generate: Vec<String>,
    pub pdf: PdfLayout,
    content_root: PathBuf,
    modified: OnceLock<DateTime<Utc>>,
    tables: BTreeMap<String, Table>,
    export: Option<ExportWorkbook>,
    export_written: bool,
    export_scheduled: bool,
    once_keys: HashSet<String>,
}

impl Book {
    pub fn new(id: impl Into<String>, content_root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            copyright: BookCopyright::default(),
            generate: Vec::new(),
            pdf: PdfLayout::default(),
            content_root: content_root.into(),
            modified: OnceLock::new(),
            tables: BTreeMap::new(),
            export: None,
            export_written: false,
            export_scheduled: false,
            once_keys: HashSet::new(),
        }
    }

    /// Build a book from its configuration; content lives under `content_dir/<id>/`
    pub fn from_config(config: &BookConfig, content_dir: &Path) -> Self {
        let mut book = Self::new(config.id.clone(), content_dir.join(&config.id));
        book.copyright = config.copyright.clone();
        book.generate = config.generate.clone();
        book.pdf = config.pdf.clone();
        book
    }

    pub fn with_generators<I, S>(mut self, generators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.generate = generators.into_iter().map(Into::into).collect();
        self
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Most recent modification time among the book's content files.
    /// Generated output under `reference/` does not count.
    ///
    /// Computed on first call and cached for the rest of the run. A missing
    /// content directory yields the Unix epoch.
    pub fn modified(&self) -> DateTime<Utc> {
        *self
            .modified
            .get_or_init(|| latest_modification(&self.content_root))
    }

    /// Expand `${modified}`, `${title}`, `${author}` and `${copyright}` in a template
    pub fn expand(&self, template: &str) -> String {
        let mut s = template.to_string();
        if s.contains("${modified}") {
            let stamp = self
                .modified()
                .format("%a, %d %b %Y %H:%M:%S UTC")
                .to_string();
            s = s.replace("${modified}", &stamp);
        }
        if s.contains("${title}") {
            let title = if self.copyright.title.is_empty() {
                DEFAULT_TITLE_MARKUP
            } else {
                self.copyright.title.as_str()
            };
            s = s.replace("${title}", title);
        }
        if s.contains("${author}") {
            s = s.replace("${author}", &self.copyright.author);
        }
        if s.contains("${copyright}") {
            s = s.replace("${copyright}", &self.copyright.copyright);
        }
        s
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn insert_table(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn has_export(&self) -> bool {
        self.export.is_some()
    }

    pub fn export(&self) -> Option<&ExportWorkbook> {
        self.export.as_ref()
    }

    /// Export workbook for this book, attaching an empty one on first use
    pub fn export_mut(&mut self) -> &mut ExportWorkbook {
        self.export.get_or_insert_with(ExportWorkbook::default)
    }

    pub fn set_export(&mut self, workbook: ExportWorkbook) {
        self.export = Some(workbook);
    }

    pub fn export_written(&self) -> bool {
        self.export_written
    }

    /// True the first time only; the export task is queued once per book
    /// however many times the book is visited.
    pub fn schedule_export_once(&mut self) -> bool {
        !std::mem::replace(&mut self.export_scheduled, true)
    }

    /// Run `write` the first time only; later calls succeed without running it.
    pub fn write_export_once<E, F>(&mut self, write: F) -> Result<(), E>
    where
        F: FnOnce(&Book) -> Result<(), E>,
    {
        if self.export_written {
            return Ok(());
        }
        self.export_written = true;
        write(self)
    }

    /// Mark a book-scoped once-key; true when the key was not yet marked
    pub fn mark_once(&mut self, key: &str) -> bool {
        self.once_keys.insert(key.to_string())
    }
}

fn latest_modification(root: &Path) -> DateTime<Utc> {
    let latest = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_generated_dir(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .filter_map(|metadata| metadata.modified().ok())
        .max()
        .unwrap_or(SystemTime::UNIX_EPOCH);
    DateTime::<Utc>::from(latest)
}

/// `<content_root>/reference`, where generated output is written
fn is_generated_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_type().is_dir() && entry.file_name() == GENERATED_DIR
}
