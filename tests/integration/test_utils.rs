//! Shared test utilities for integration tests
//!
//! Serializes access to the environment variables the config loader reads and
//! builds small content trees for books.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        if let Some(orig) = self.xdg_config_home {
            std::env::set_var("XDG_CONFIG_HOME", orig);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME pointing at `<test_dir>/xdg`, which is returned
/// to the closure. The original environment is restored afterwards.
pub fn with_config_home<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = f(&config_home);

    env_state.restore();
    result
}

/// Create `<root>/content/<id>` with the given files (relative path, contents)
pub fn write_book(root: &Path, id: &str, files: &[(&str, &str)]) -> PathBuf {
    let book_root = root.join("content").join(id);
    std::fs::create_dir_all(&book_root).unwrap();
    for (path, contents) in files {
        let path = book_root.join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
    book_root
}
