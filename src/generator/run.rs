//! Book processing loop.

use super::registry::{Dispatch, GeneratorRegistry};
use super::task::Task;
use super::{GenerationContext, SiteSettings};
use crate::book::Bookshelf;
use crate::error::GenerateError;
use crate::output::{ExportWriter, JsonExportWriter};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Priority of the per-book export task; runs after the higher-priority
/// finishing work scheduled by generators.
pub const EXPORT_TASK_PRIORITY: i32 = 100;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub books: usize,
    pub dispatched: usize,
    pub unresolved: usize,
    pub tasks_run: usize,
}

/// Runs the configured generators over every book, then the deferred tasks
pub struct Generator {
    registry: GeneratorRegistry,
    export_writer: Arc<dyn ExportWriter>,
    site: SiteSettings,
}

impl Generator {
    pub fn new(registry: GeneratorRegistry) -> Self {
        Self::with_export_writer(registry, Arc::new(JsonExportWriter))
    }

    pub fn with_export_writer(
        registry: GeneratorRegistry,
        export_writer: Arc<dyn ExportWriter>,
    ) -> Self {
        Self {
            registry,
            export_writer,
            site: SiteSettings::default(),
        }
    }

    /// Site settings handed to every handler through the context
    pub fn with_site(mut self, site: SiteSettings) -> Self {
        self.site = site;
        self
    }

    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Generate every book, then drain the deferred tasks.
    ///
    /// The first failure from any generator or task aborts the run.
    pub fn run(&self, shelf: &mut Bookshelf) -> Result<RunSummary, GenerateError> {
        let mut ctx = GenerationContext::with_site(self.site.clone());
        let mut summary = self.generate(&mut ctx, shelf)?;

        info!(tasks = ctx.tasks().len(), "Running deferred tasks");
        summary.tasks_run = ctx.drain(shelf)?;

        info!(
            books = summary.books,
            dispatched = summary.dispatched,
            unresolved = summary.unresolved,
            tasks = summary.tasks_run,
            "Generation complete"
        );
        Ok(summary)
    }

    /// Dispatch each book's generators in declared order, scheduling the
    /// export task for books that carry export data. A book declared twice is
    /// visited twice but its export task is queued once. Tasks are left queued.
    pub fn generate(
        &self,
        ctx: &mut GenerationContext,
        shelf: &mut Bookshelf,
    ) -> Result<RunSummary, GenerateError> {
        let mut summary = RunSummary::default();

        for index in 0..shelf.entry_count() {
            let Some((book, names)) = shelf.entry_mut(index) else {
                continue;
            };
            info!(book = %book.id, generators = names.len(), "Generating book");
            summary.books += 1;

            for name in names {
                match self.registry.dispatch(ctx, book, name)? {
                    Dispatch::Ran => summary.dispatched += 1,
                    Dispatch::Unresolved => summary.unresolved += 1,
                }
            }

            if book.has_export() && book.schedule_export_once() {
                let writer = Arc::clone(&self.export_writer);
                ctx.add_priority_task(
                    EXPORT_TASK_PRIORITY,
                    Task::for_book(format!("export {}", book.id), book.id.clone(), move |book| {
                        book.write_export_once(|book| match book.export() {
                            Some(workbook) => writer
                                .write_export(book, workbook)
                                .map(|_| ())
                                .map_err(GenerateError::from),
                            None => Ok(()),
                        })
                    }),
                );
            }
        }

        Ok(summary)
    }
}
