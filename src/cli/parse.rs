//! CLI parse: clap types for bookgen. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bookgen - documentation book generation pipeline
#[derive(Parser)]
#[command(name = "bookgen")]
#[command(about = "Run documentation generators over configured books and render their PDFs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every book's generators, the deferred finishing tasks, then PDFs
    Build {
        /// Skip the PDF stage
        #[arg(long)]
        no_pdf: bool,
        /// Only build the given book (repeatable)
        #[arg(long = "book", value_name = "ID")]
        books: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List configured books
    Books {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List registered generators
    Generators {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the resolved configuration as TOML
    Config,
}
