//! Built-in inventory generators over a real content tree.

use super::test_utils::write_book;
use bookgen::book::{Book, Bookshelf};
use bookgen::builtin::{builtin_registry, INVENTORY_TABLE};
use bookgen::generator::Generator;
use bookgen::output::{reference_path, write_if_stale, JsonExportWriter, WriteOutcome};
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[test]
fn inventory_and_export_share_one_scan() {
    let dir = TempDir::new().unwrap();
    let root = write_book(
        dir.path(),
        "bbc",
        &[("_index.html", "<h1>BBC</h1>"), ("api/osword.html", "osword")],
    );
    let generator = Generator::new(builtin_registry());
    let mut shelf = Bookshelf::new(vec![
        Book::new("bbc", &root).with_generators(["inventory", "inventory-export"])
    ]);

    let summary = generator.run(&mut shelf).unwrap();
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.tasks_run, 1);

    let book = shelf.get("bbc").unwrap();
    assert_eq!(book.table(INVENTORY_TABLE).unwrap().len(), 2);
    assert!(book.export_written());

    let page: serde_json::Value =
        serde_json::from_slice(&fs::read(root.join("reference/inventory.json")).unwrap())
            .unwrap();
    assert_eq!(page["book"], "bbc");
    assert_eq!(page["files"][1][0], "api/osword.html");

    let export: serde_json::Value =
        serde_json::from_slice(&fs::read(JsonExportWriter::path_for(book)).unwrap()).unwrap();
    assert_eq!(export["sheets"][0]["title"], "Inventory");
}

#[test]
fn generated_reference_output_is_not_inventoried_on_rerun() {
    let dir = TempDir::new().unwrap();
    let root = write_book(dir.path(), "6502", &[("_index.html", "6502")]);

    for _ in 0..2 {
        let generator = Generator::new(builtin_registry());
        let mut shelf = Bookshelf::new(vec![
            Book::new("6502", &root).with_generators(["inventory"])
        ]);
        generator.run(&mut shelf).unwrap();
        let book = shelf.get("6502").unwrap();
        assert_eq!(book.table(INVENTORY_TABLE).unwrap().len(), 1);
    }
}

#[test]
fn missing_content_directory_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    let generator = Generator::new(builtin_registry());
    let mut shelf = Bookshelf::new(vec![
        Book::new("z80", dir.path().join("content/z80")).with_generators(["inventory"])
    ]);

    let err = generator.run(&mut shelf).unwrap_err();
    assert!(err.to_string().contains("extraction failed"));
}

#[test]
fn duplicated_book_is_scanned_once_and_exported_once() {
    let dir = TempDir::new().unwrap();
    let root = write_book(dir.path(), "bbc", &[("_index.html", "<h1>BBC</h1>")]);
    let generator = Generator::new(builtin_registry());
    let mut shelf = Bookshelf::new(vec![
        Book::new("bbc", &root).with_generators(["inventory-export"]),
        Book::new("bbc", &root).with_generators(["inventory-export"]),
    ]);

    let summary = generator.run(&mut shelf).unwrap();
    assert_eq!(summary.books, 2);
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.tasks_run, 1);

    let book = shelf.get("bbc").unwrap();
    assert_eq!(book.table(INVENTORY_TABLE).unwrap().len(), 1);
    assert_eq!(book.export().unwrap().sheets.len(), 1);
    assert!(JsonExportWriter::path_for(book).exists());
}

#[test]
fn rerun_over_unchanged_content_leaves_outputs_alone() {
    let dir = TempDir::new().unwrap();
    let root = write_book(dir.path(), "6502", &[("_index.html", "6502")]);
    let content_time = SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(root.join("_index.html"))
        .unwrap()
        .set_modified(content_time)
        .unwrap();

    let build = || {
        let generator = Generator::new(builtin_registry());
        let mut shelf = Bookshelf::new(vec![
            Book::new("6502", &root).with_generators(["inventory", "inventory-export"])
        ]);
        generator.run(&mut shelf).unwrap();
        shelf
    };
    let page = reference_path(&root, "", "inventory.json");
    let export = JsonExportWriter::path_for(&Book::new("6502", &root));

    build();
    let page_mtime = fs::metadata(&page).unwrap().modified().unwrap();
    let export_mtime = fs::metadata(&export).unwrap().modified().unwrap();

    let shelf = build();
    assert_eq!(fs::metadata(&page).unwrap().modified().unwrap(), page_mtime);
    assert_eq!(fs::metadata(&export).unwrap().modified().unwrap(), export_mtime);

    let book = shelf.get("6502").unwrap();
    assert_eq!(
        write_if_stale(&page, book.modified(), b"{}").unwrap(),
        WriteOutcome::Skipped
    );
}
