//! Content inventory: a table of every source file in a book.

use crate::book::{Book, Table, GENERATED_DIR};
use crate::error::{GenerateError, StorageError};
use crate::generator::{Extractor, GenerationContext};
use crate::output::{reference_path, write_if_stale};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use walkdir::{DirEntry, WalkDir};

/// Name of the book table filled by [`InventoryExtractor`]
pub const INVENTORY_TABLE: &str = "inventory";

/// Scans a book's content root; generated `reference/` output is excluded.
#[derive(Debug, Clone)]
pub struct InventoryExtractor {
    skip_dirs: Vec<String>,
}

impl Default for InventoryExtractor {
    fn default() -> Self {
        Self {
            skip_dirs: vec![GENERATED_DIR.to_string()],
        }
    }
}

impl InventoryExtractor {
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry.depth() == 1
            && entry
                .file_name()
                .to_str()
                .map(|name| self.skip_dirs.iter().any(|skip| skip == name))
                .unwrap_or(false)
    }
}

impl Extractor for InventoryExtractor {
    fn name(&self) -> &str {
        "content inventory"
    }

    fn extract(&self, book: &mut Book) -> Result<(), StorageError> {
        let root = book.content_root().to_path_buf();
        let mut table = Table::new("Inventory", ["Path", "Bytes", "Modified"]);

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(entry));

        for entry in walker {
            let entry = entry.map_err(|e| StorageError::ScanFailed {
                path: root.clone(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| StorageError::ScanFailed {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(|e| StorageError::InvalidPath(e.to_string()))?;
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let modified = metadata
                .modified()
                .map(|m| DateTime::<Utc>::from(m).to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default();

            table.push_row(vec![json!(path), json!(metadata.len()), json!(modified)]);
        }

        book.insert_table(INVENTORY_TABLE, table);
        Ok(())
    }
}

fn inventory_table(book: &Book, generator: &str) -> Result<Table, GenerateError> {
    book.table(INVENTORY_TABLE)
        .cloned()
        .ok_or_else(|| GenerateError::handler(&book.id, generator, "inventory has not been extracted"))
}

/// Write the inventory to `<content_root>/reference/inventory.json`
pub fn write_inventory_page(
    ctx: &mut GenerationContext,
    book: &mut Book,
) -> Result<(), GenerateError> {
    let table = inventory_table(book, "inventory")?;
    let page = json!({
        "book": book.id,
        "title": book.copyright.title,
        "url": ctx.site().book_url(&book.id),
        "modified": book.modified().to_rfc3339_opts(SecondsFormat::Secs, true),
        "files": table.rows,
    });
    let bytes = serde_json::to_vec_pretty(&page).map_err(StorageError::from)?;
    let path = reference_path(book.content_root(), "", "inventory.json");
    write_if_stale(&path, book.modified(), &bytes)?;
    Ok(())
}

/// Attach the inventory as a sheet of the book's export workbook
pub fn export_inventory(
    _ctx: &mut GenerationContext,
    book: &mut Book,
) -> Result<(), GenerateError> {
    let table = inventory_table(book, "inventory-export")?;
    book.export_mut().put_sheet(table);
    Ok(())
}
