//! Tabular data extracted from a book and the export workbook it feeds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Titled table of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<I, S>(title: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Export accumulator attached to a book; one sheet per table title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportWorkbook {
    pub sheets: Vec<Table>,
}

impl ExportWorkbook {
    /// Add a sheet, replacing any existing sheet with the same title
    pub fn put_sheet(&mut self, table: Table) {
        match self.sheets.iter_mut().find(|s| s.title == table.title) {
            Some(existing) => *existing = table,
            None => self.sheets.push(table),
        }
    }

    pub fn sheet(&self, title: &str) -> Option<&Table> {
        self.sheets.iter().find(|s| s.title == title)
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
