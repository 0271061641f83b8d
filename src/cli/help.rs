//! CLI command-name contract used for logging.

use crate::cli::parse::Commands;

/// Stable command name, e.g. "build" or "books".
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Build { .. } => "build",
        Commands::Books { .. } => "books",
        Commands::Generators { .. } => "generators",
        Commands::Config => "config",
    }
}
