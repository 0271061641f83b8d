//! CLI presentation: text and json formatters per command.

use crate::book::BookConfig;
use crate::config::BookgenConfig;
use crate::error::ApiError;
use crate::generator::RunSummary;
use crate::pdf::PdfReport;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Outcome of `bookgen build`
#[derive(Debug)]
pub struct BuildReport {
    pub summary: RunSummary,
    /// None when the PDF stage did not run
    pub pdf: Option<PdfReport>,
}

fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(crate::error::StorageError::Serialization(e)))
}

fn heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub fn format_books(books: &[BookConfig], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        let arr: Vec<serde_json::Value> = books
            .iter()
            .map(|b| {
                json!({
                    "id": b.id,
                    "title": b.copyright.title,
                    "author": b.copyright.author,
                    "generate": b.generate,
                })
            })
            .collect();
        return to_json(&serde_json::Value::Array(arr));
    }

    if books.is_empty() {
        return Ok("No books configured.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Author", "Generators"]);
    for b in books {
        let generators = if b.generate.is_empty() {
            "-".to_string()
        } else {
            b.generate.join(", ")
        };
        table.add_row(vec![
            b.id.as_str(),
            b.copyright.title.as_str(),
            b.copyright.author.as_str(),
            generators.as_str(),
        ]);
    }
    Ok(format!("{}\n{}", heading("Books"), table))
}

pub fn format_generators(names: &[&str], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(&json!(names));
    }
    let mut out = heading("Generators");
    for name in names {
        out.push_str("\n  ");
        out.push_str(name);
    }
    Ok(out)
}

pub fn format_build_result(report: &BuildReport, format: &str) -> Result<String, ApiError> {
    let summary = &report.summary;
    if format == "json" {
        let pdf = report.pdf.as_ref().map(|pdf| {
            json!({
                "rendered": pdf.rendered,
                "up_to_date": pdf.up_to_date,
                "failures": pdf
                    .failures
                    .iter()
                    .map(|(id, err)| json!({ "book": id, "error": err.to_string() }))
                    .collect::<Vec<_>>(),
            })
        });
        return to_json(&json!({ "generation": summary, "pdf": pdf }));
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Books", "Generators run", "Unresolved", "Tasks run"]);
    table.add_row(vec![
        summary.books.to_string(),
        summary.dispatched.to_string(),
        summary.unresolved.to_string(),
        summary.tasks_run.to_string(),
    ]);
    let mut out = format!("{}\n{}", heading("Generation"), table);

    match &report.pdf {
        None => out.push_str("\n\nPDF stage skipped."),
        Some(pdf) => {
            out.push_str(&format!("\n\n{}", heading("PDF")));
            for id in &pdf.rendered {
                out.push_str(&format!("\n  {} {}", "rendered".green(), id));
            }
            for id in &pdf.up_to_date {
                out.push_str(&format!("\n  {} {}", "up to date".dimmed(), id));
            }
            for (id, err) in &pdf.failures {
                out.push_str(&format!("\n  {} {}: {}", "failed".red(), id, err));
            }
        }
    }
    Ok(out)
}

pub fn format_config_toml(config: &BookgenConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize configuration: {}", e)))
}
