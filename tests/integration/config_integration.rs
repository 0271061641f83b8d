//! Layered configuration loading through ConfigLoader.

use super::test_utils::with_config_home;
use bookgen::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_workspace_books_load_in_order() {
    let temp_dir = TempDir::new().unwrap();
    with_config_home(&temp_dir, |_| {
        let workspace = temp_dir.path().join("site");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(
            workspace.join(WORKSPACE_CONFIG_FILE),
            r#"
[[books]]
id = "bbc"
title = "BBC Micro"
generate = ["inventory"]

[[books]]
id = "6502"
generate = ["inventory", "inventory-export"]
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        let ids: Vec<&str> = config.books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["bbc", "6502"]);

        let shelf = config.bookshelf(&workspace);
        assert_eq!(shelf.len(), 2);
        assert_eq!(
            shelf.get("6502").unwrap().content_root(),
            workspace.join("content").join("6502")
        );
    });
}

#[test]
fn test_global_pdf_defaults_with_workspace_books() {
    let temp_dir = TempDir::new().unwrap();
    with_config_home(&temp_dir, |config_home| {
        std::fs::create_dir_all(config_home.join("bookgen")).unwrap();
        std::fs::write(
            config_home.join("bookgen").join("config.toml"),
            r#"
[pdf.layout]
footer = "<span>${copyright}</span>"
landscape = true
"#,
        )
        .unwrap();
        assert_eq!(
            ConfigLoader::global_config_path(),
            Some(config_home.join("bookgen").join("config.toml"))
        );

        let workspace = temp_dir.path().join("site");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::write(
            workspace.join(WORKSPACE_CONFIG_FILE),
            "[site]\nstatic_dir = \"public\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        let settings = config.pdf_settings(&workspace);
        assert!(settings.defaults.landscape);
        assert_eq!(settings.defaults.footer_template, "<span>${copyright}</span>");
        assert_eq!(settings.static_dir, workspace.join("public"));
    });
}

#[test]
fn test_load_from_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing: PathBuf = temp_dir.path().join("nope.toml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}

#[test]
fn test_malformed_workspace_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    with_config_home(&temp_dir, |_| {
        std::fs::write(
            temp_dir.path().join(WORKSPACE_CONFIG_FILE),
            "[[books]]\nid = \n",
        )
        .unwrap();
        assert!(ConfigLoader::load(temp_dir.path()).is_err());
    });
}
