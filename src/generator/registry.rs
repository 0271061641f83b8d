//! Generator registry: name to handler dispatch table.

use super::handler::{handler_of, BoxHandler, Handler};
use super::GenerationContext;
use crate::book::Book;
use crate::error::GenerateError;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of dispatching one generator name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The bound handler ran and succeeded
    Ran,
    /// No handler is registered under the name; nothing ran
    Unresolved,
}

/// Registry mapping generator names to handlers.
///
/// Built once at startup and read-only afterwards.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, BoxHandler>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `handler`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered; that is a deployment defect,
    /// not a runtime condition.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        let name = name.into();
        if self.generators.contains_key(&name) {
            panic!("generator {} already registered", name);
        }
        self.generators.insert(name, Box::new(handler));
        self
    }

    /// Bind `name` to the left-to-right chain of `handlers`
    pub fn register_chain(&mut self, name: impl Into<String>, handlers: Vec<BoxHandler>) -> &mut Self {
        self.register(name, handler_of(handlers))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.generators.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Run the handler bound to `name` against `book`.
    ///
    /// An unknown name is logged and treated as success so that a partial
    /// deployment or stale configuration never aborts a build.
    pub fn dispatch(
        &self,
        ctx: &mut GenerationContext,
        book: &mut Book,
        name: &str,
    ) -> Result<Dispatch, GenerateError> {
        match self.generators.get(name) {
            Some(handler) => {
                debug!(book = %book.id, generator = name, "Running generator");
                handler.handle(ctx, book)?;
                Ok(Dispatch::Ran)
            }
            None => {
                warn!(book = %book.id, generator = name, "Generator is not registered");
                Ok(Dispatch::Unresolved)
            }
        }
    }
}
