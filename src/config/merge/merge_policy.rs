//! Merge rules: built-in defaults applied beneath every other source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1313/";
pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const DEFAULT_STATIC_DIR: &str = ".";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("site.base_url", DEFAULT_BASE_URL)?
        .set_default("site.content_dir", DEFAULT_CONTENT_DIR)?
        .set_default("site.static_dir", DEFAULT_STATIC_DIR)?
        .set_default("pdf.enabled", false)
}
