//! CLI domain: parse, route, help, output, and presentation only.
//! No pipeline logic; the route table dispatches to the generator and PDF stage.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_books, format_build_result, format_config_toml, format_generators, BuildReport,
};
pub use route::RunContext;
