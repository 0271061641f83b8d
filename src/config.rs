//! Configuration System
//!
//! Layered configuration for a documentation site: where the content lives,
//! which books exist and which generators each runs, PDF settings and
//! logging. See [`ConfigLoader`] for the source order.

use crate::book::{BookConfig, Bookshelf, PdfLayout, PrintOptions};
use crate::generator::SiteSettings;
use crate::logging::LoggingConfig;
use crate::pdf::PdfSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::{DEFAULT_BASE_URL, DEFAULT_CONTENT_DIR, DEFAULT_STATIC_DIR};
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookgenConfig {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub pdf: PdfConfig,

    /// Books in processing order
    #[serde(default)]
    pub books: Vec<BookConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Site layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the running site, used to reach each book's print view
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding one content directory per book
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Root under which `static/book/<id>.pdf` is written
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_DIR)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            content_dir: default_content_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl SiteConfig {
    /// Content directory, relative paths resolved against `workspace_root`
    pub fn content_dir(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.content_dir)
    }

    pub fn static_dir(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.static_dir)
    }
}

/// PDF stage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub enabled: bool,

    /// DevTools websocket of an already running browser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_ws: Option<String>,

    /// Site-wide layout; books override it field by field
    #[serde(default)]
    pub layout: PdfLayout,
}

impl PdfConfig {
    pub fn print_defaults(&self) -> PrintOptions {
        self.layout.resolve(&PrintOptions::default())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Site(String),
    Pdf(String),
    Book(String, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Site(msg) => write!(f, "Site: {}", msg),
            ValidationError::Pdf(msg) => write!(f, "PDF: {}", msg),
            ValidationError::Book(id, msg) => write!(f, "Book '{}': {}", id, msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_layout(layout: &PdfLayout) -> Result<(), String> {
    if let Some(margin) = &layout.margin {
        let sides = [margin.top, margin.bottom, margin.left, margin.right];
        if sides.iter().any(|side| !side.is_finite() || *side < 0.0) {
            return Err("margins must be non-negative".to_string());
        }
    }
    for (name, value) in [("width", layout.width), ("height", layout.height)] {
        if let Some(value) = value {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("paper {} must be positive", name));
            }
        }
    }
    Ok(())
}

impl BookgenConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.site.base_url.trim().is_empty() {
            errors.push(ValidationError::Site("base_url cannot be empty".to_string()));
        }
        if self.site.content_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Site("content_dir cannot be empty".to_string()));
        }

        if let Err(e) = validate_layout(&self.pdf.layout) {
            errors.push(ValidationError::Pdf(e));
        }
        if self.pdf.enabled && self.pdf.browser_ws.is_none() {
            errors.push(ValidationError::Pdf(
                "browser_ws is required when PDF generation is enabled".to_string(),
            ));
        }

        for book in &self.books {
            if book.id.trim().is_empty() {
                errors.push(ValidationError::Book(
                    book.id.clone(),
                    "id cannot be empty".to_string(),
                ));
            } else if book.id.contains(['/', '\\']) {
                errors.push(ValidationError::Book(
                    book.id.clone(),
                    "id cannot contain path separators".to_string(),
                ));
            }
            if let Err(e) = validate_layout(&book.pdf) {
                errors.push(ValidationError::Book(book.id.clone(), e));
            }
        }

        const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "unknown level '{}'",
                self.logging.level
            )));
        }
        if !["text", "json"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "unknown format '{}'",
                self.logging.format
            )));
        }
        if !["stdout", "stderr", "file"].contains(&self.logging.output.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "unknown output '{}'",
                self.logging.output
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Books in configuration order, rooted under the site content directory
    pub fn bookshelf(&self, workspace_root: &Path) -> Bookshelf {
        Bookshelf::from_configs(&self.books, &self.site.content_dir(workspace_root))
    }

    pub fn site_settings(&self, workspace_root: &Path) -> SiteSettings {
        SiteSettings {
            base_url: self.site.base_url.clone(),
            content_dir: self.site.content_dir(workspace_root),
            static_dir: self.site.static_dir(workspace_root),
        }
    }

    pub fn pdf_settings(&self, workspace_root: &Path) -> PdfSettings {
        PdfSettings {
            enabled: self.pdf.enabled,
            base_url: self.site.base_url.clone(),
            static_dir: self.site.static_dir(workspace_root),
            defaults: self.pdf.print_defaults(),
        }
    }
}
