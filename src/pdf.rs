//! PDF finishing stage
//!
//! Renders each book's print view through an opaque [`PdfRenderer`] and
//! stores the result under `<static_dir>/static/book/<id>.pdf`. A failure for
//! one book is reported and does not stop the others.

#[cfg(feature = "chromium")]
mod chromium;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderer;

use crate::book::{Book, Bookshelf, PrintOptions};
use crate::error::RenderError;
use crate::output::{write_if_stale, WriteOutcome};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Everything the renderer needs for one book
#[derive(Debug, Clone, PartialEq)]
pub struct PrintRequest {
    pub book_id: String,
    pub url: String,
    /// Layout with header and footer templates already expanded
    pub options: PrintOptions,
}

/// Renders a navigable page to PDF bytes
pub trait PdfRenderer {
    fn render(&self, request: &PrintRequest) -> Result<Vec<u8>, RenderError>;
}

/// Site-level inputs of the PDF stage
#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub enabled: bool,
    pub base_url: String,
    pub static_dir: PathBuf,
    pub defaults: PrintOptions,
}

/// Per-book outcome of a PDF stage run
#[derive(Debug, Default)]
pub struct PdfReport {
    pub rendered: Vec<String>,
    pub up_to_date: Vec<String>,
    pub failures: Vec<(String, RenderError)>,
}

impl PdfReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// URL of a book's print view: `<base_url>/<id>/_print/`
pub fn print_url(base_url: &str, book_id: &str) -> String {
    format!("{}/{}/_print/", base_url.trim_end_matches('/'), book_id)
}

/// Output location of a book's PDF
pub fn pdf_path(static_dir: &Path, book_id: &str) -> PathBuf {
    static_dir
        .join("static")
        .join("book")
        .join(format!("{}.pdf", book_id))
}

pub struct PdfStage<'a> {
    renderer: &'a dyn PdfRenderer,
    settings: PdfSettings,
}

impl<'a> PdfStage<'a> {
    pub fn new(renderer: &'a dyn PdfRenderer, settings: PdfSettings) -> Self {
        Self { renderer, settings }
    }

    /// Build the render request for `book`
    pub fn request_for(&self, book: &Book) -> PrintRequest {
        let mut options = book.pdf.resolve(&self.settings.defaults);
        options.header_template = book.expand(&options.header_template);
        options.footer_template = book.expand(&options.footer_template);
        PrintRequest {
            book_id: book.id.clone(),
            url: print_url(&self.settings.base_url, &book.id),
            options,
        }
    }

    /// Render one book and persist the bytes
    pub fn render_book(&self, book: &Book) -> Result<WriteOutcome, RenderError> {
        let request = self.request_for(book);
        let bytes = self.renderer.render(&request)?;
        let outcome = write_if_stale(
            &pdf_path(&self.settings.static_dir, &book.id),
            book.modified(),
            &bytes,
        )?;
        Ok(outcome)
    }

    pub fn run(&self, shelf: &Bookshelf) -> PdfReport {
        let mut report = PdfReport::default();
        if !self.settings.enabled {
            info!("PDF generation disabled");
            return report;
        }

        for book in shelf.books() {
            info!(book = %book.id, "Generating PDF");
            match self.render_book(book) {
                Ok(WriteOutcome::Written) => report.rendered.push(book.id.clone()),
                Ok(WriteOutcome::Skipped) => report.up_to_date.push(book.id.clone()),
                Err(err) => {
                    error!(book = %book.id, error = %err, "PDF generation failed");
                    report.failures.push((book.id.clone(), err));
                }
            }
        }
        report
    }
}
