//! Deferred finishing tasks.

use crate::book::{Book, Bookshelf};
use crate::error::GenerateError;
use std::fmt;

type DetachedJob = Box<dyn FnOnce() -> Result<(), GenerateError>>;
type BookJob = Box<dyn FnOnce(&mut Book) -> Result<(), GenerateError>>;

enum Job {
    Detached(DetachedJob),
    Book { id: String, job: BookJob },
}

/// Work scheduled during generation and run only after every book has
/// finished every generator.
pub struct Task {
    label: String,
    job: Job,
}

impl Task {
    /// Zero-argument task
    pub fn new<F>(label: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> Result<(), GenerateError> + 'static,
    {
        Self {
            label: label.into(),
            job: Job::Detached(Box::new(job)),
        }
    }

    /// Task over a book; the book is looked up by id on the shelf when the task runs
    pub fn for_book<F>(label: impl Into<String>, book_id: impl Into<String>, job: F) -> Self
    where
        F: FnOnce(&mut Book) -> Result<(), GenerateError> + 'static,
    {
        Self {
            label: label.into(),
            job: Job::Book {
                id: book_id.into(),
                job: Box::new(job),
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn run(self, shelf: &mut Bookshelf) -> Result<(), GenerateError> {
        let Task { label, job } = self;
        tracing::debug!(task = %label, "Running deferred task");
        let result = match job {
            Job::Detached(job) => job(),
            Job::Book { id, job } => match shelf.get_mut(&id) {
                Some(book) => job(book),
                None => Err(GenerateError::UnknownBook(id)),
            },
        };
        result.map_err(|source| GenerateError::Task {
            label,
            source: Box::new(source),
        })
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.job {
            Job::Detached(_) => None,
            Job::Book { id, .. } => Some(id.as_str()),
        };
        f.debug_struct("Task")
            .field("label", &self.label)
            .field("book", &target)
            .finish()
    }
}
