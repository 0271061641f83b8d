//! Generation orchestrator
//!
//! Books are processed one at a time. For each book the declared generator
//! names are dispatched in order through the [`GeneratorRegistry`]; generators
//! mutate book-scoped state and may schedule deferred [`Task`]s. Once every
//! book has run every generator, the deferred tasks drain in priority order.

mod guard;
mod handler;
mod registry;
mod run;
mod task;

pub use guard::{ExtractionGuard, Extractor, Guarded};
pub use handler::{
    handler_fn, handler_of, BoxHandler, FnHandler, Handler, HandlerExt, Noop, OnceFlag,
    OncePerBook, RunOnce, Then,
};
pub use registry::{Dispatch, GeneratorRegistry};
pub use run::{Generator, RunSummary, EXPORT_TASK_PRIORITY};
pub use task::Task;

use crate::book::Bookshelf;
use crate::error::GenerateError;
use crate::queue::PriorityQueue;
use std::path::PathBuf;

/// Site-wide settings handlers may read while generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    pub base_url: String,
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl SiteSettings {
    /// Public URL of a book's landing page
    pub fn book_url(&self, book_id: &str) -> String {
        format!("{}/{}/", self.base_url.trim_end_matches('/'), book_id)
    }
}

/// State shared by every handler during one run: the deferred task queue
/// and the read-only site settings.
#[derive(Default)]
pub struct GenerationContext {
    tasks: PriorityQueue<Task>,
    site: SiteSettings,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site(site: SiteSettings) -> Self {
        Self {
            tasks: PriorityQueue::new(),
            site,
        }
    }

    pub fn site(&self) -> &SiteSettings {
        &self.site
    }

    /// Schedule a task to run after all books finish, at the default priority
    pub fn add_task(&mut self, task: Task) -> &mut Self {
        self.tasks.add(task);
        self
    }

    /// Schedule a task at an explicit priority; lower values run earlier
    pub fn add_priority_task(&mut self, priority: i32, task: Task) -> &mut Self {
        self.tasks.add_priority(priority, task);
        self
    }

    pub fn tasks(&self) -> &PriorityQueue<Task> {
        &self.tasks
    }

    /// Run every scheduled task against the shelf; returns how many ran
    pub fn drain(&mut self, shelf: &mut Bookshelf) -> Result<usize, GenerateError> {
        self.tasks.drain(|task| task.run(shelf))
    }
}
