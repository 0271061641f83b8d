//! Config loading facade: one place that knows the source order.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::BookgenConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `workspace_root`.
    ///
    /// Precedence (highest last): built-in defaults, global config file,
    /// `<workspace>/bookgen.toml`, `BOOKGEN__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<BookgenConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single file on top of the built-in defaults.
    /// Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<BookgenConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<BookgenConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }
}
