//! CLI route: single route table and run context. Dispatches to the generator,
//! the PDF stage and presentation.

use crate::builtin::builtin_registry;
use crate::cli::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_books, format_build_result, format_config_toml, format_generators, BuildReport,
};
use crate::config::{BookgenConfig, ConfigLoader};
use crate::error::ApiError;
use crate::generator::{Generator, GeneratorRegistry};
use crate::pdf::{PdfRenderer, PdfStage};
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// Runtime context for CLI execution: workspace root and resolved configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: BookgenConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::from_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn from_config(workspace_root: PathBuf, config: BookgenConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &BookgenConfig {
        &self.config
    }

    /// Registry of every generator the binary knows
    pub fn registry(&self) -> GeneratorRegistry {
        builtin_registry()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let _span = info_span!("command", name = command_name(command)).entered();
        match command {
            Commands::Build {
                no_pdf,
                books,
                format,
            } => {
                let report = if *no_pdf {
                    self.build(books, None)?
                } else {
                    let renderer = self.renderer()?;
                    self.build(books, renderer.as_deref())?
                };
                let output = format_build_result(&report, format)?;
                match report.pdf {
                    Some(pdf) if !pdf.is_success() => Err(ApiError::PdfFailed {
                        failed: pdf.failures.len(),
                    }),
                    _ => Ok(output),
                }
            }
            Commands::Books { format } => format_books(&self.config.books, format),
            Commands::Generators { format } => {
                let registry = self.registry();
                format_generators(&registry.names(), format)
            }
            Commands::Config => format_config_toml(&self.config),
        }
    }

    /// Generate the selected books (all when `books` is empty), drain the
    /// deferred tasks, then render PDFs through `renderer` when given.
    pub fn build(
        &self,
        books: &[String],
        renderer: Option<&dyn PdfRenderer>,
    ) -> Result<BuildReport, ApiError> {
        let mut shelf = self.config.bookshelf(&self.workspace_root);
        if !books.is_empty() {
            shelf.retain_ids(books).map_err(ApiError::UnknownBook)?;
        }

        let generator =
            Generator::new(self.registry()).with_site(self.config.site_settings(&self.workspace_root));
        let summary = generator.run(&mut shelf)?;

        let pdf = renderer.map(|renderer| {
            PdfStage::new(renderer, self.config.pdf_settings(&self.workspace_root)).run(&shelf)
        });
        if let Some(report) = &pdf {
            info!(
                rendered = report.rendered.len(),
                up_to_date = report.up_to_date.len(),
                failed = report.failures.len(),
                "PDF stage complete"
            );
        }

        Ok(BuildReport { summary, pdf })
    }

    /// The configured renderer, or None when PDF generation is disabled.
    fn renderer(&self) -> Result<Option<Box<dyn PdfRenderer>>, ApiError> {
        if !self.config.pdf.enabled {
            return Ok(None);
        }
        let Some(browser_ws) = self.config.pdf.browser_ws.clone() else {
            return Err(ApiError::ConfigError(
                "pdf.browser_ws is required when PDF generation is enabled".to_string(),
            ));
        };
        Self::connect_renderer(browser_ws)
    }

    #[cfg(feature = "chromium")]
    fn connect_renderer(browser_ws: String) -> Result<Option<Box<dyn PdfRenderer>>, ApiError> {
        let renderer = crate::pdf::ChromiumRenderer::new(browser_ws)?;
        Ok(Some(Box::new(renderer)))
    }

    #[cfg(not(feature = "chromium"))]
    fn connect_renderer(browser_ws: String) -> Result<Option<Box<dyn PdfRenderer>>, ApiError> {
        tracing::warn!(browser_ws = %browser_ws, "PDF generation enabled but bookgen was built without the chromium feature");
        Err(ApiError::RenderError(crate::error::RenderError::Unavailable(
            "rebuild with --features chromium".to_string(),
        )))
    }
}
