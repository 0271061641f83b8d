//! Handler composition.
//!
//! A handler is a unit of work over one book. Handlers chain left to right
//! with [`HandlerExt::then`]; the first failure short-circuits the chain and
//! nothing already done is rolled back.

use super::GenerationContext;
use crate::book::Book;
use crate::error::GenerateError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Executable unit of work over a single book
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError>;
}

pub type BoxHandler = Box<dyn Handler>;

impl Handler for Box<dyn Handler> {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        (**self).handle(ctx, book)
    }
}

impl Handler for Arc<dyn Handler> {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        (**self).handle(ctx, book)
    }
}

/// Handler backed by a closure; see [`handler_fn`]
#[derive(Clone)]
pub struct FnHandler<F> {
    f: F,
}

/// Lift a closure into a [`Handler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut GenerationContext, &mut Book) -> Result<(), GenerateError> + Send + Sync,
{
    FnHandler { f }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut GenerationContext, &mut Book) -> Result<(), GenerateError> + Send + Sync,
{
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        (self.f)(ctx, book)
    }
}

/// Always succeeds without doing anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Noop;

impl Handler for Noop {
    fn handle(&self, _ctx: &mut GenerationContext, _book: &mut Book) -> Result<(), GenerateError> {
        Ok(())
    }
}

/// `first`, then `next` if `first` succeeded
#[derive(Clone)]
pub struct Then<A, B> {
    first: A,
    next: B,
}

impl<A: Handler, B: Handler> Handler for Then<A, B> {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        self.first.handle(ctx, book)?;
        self.next.handle(ctx, book)
    }
}

/// Caller-owned flag recording whether a [`RunOnce`] has fired.
///
/// Clones share the same state. The flag is not tied to any book: a chain
/// wrapped with one flag runs once in total, whichever book triggers it.
#[derive(Debug, Clone, Default)]
pub struct OnceFlag(Arc<AtomicBool>);

impl OnceFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag; true if it was previously unset
    fn set(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

/// Runs the inner handler on the first invocation only
#[derive(Clone)]
pub struct RunOnce<H> {
    inner: H,
    flag: OnceFlag,
}

impl<H: Handler> Handler for RunOnce<H> {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        if self.flag.set() {
            return self.inner.handle(ctx, book);
        }
        Ok(())
    }
}

/// Runs the inner handler once per book, keyed by a book-scoped once-key
#[derive(Clone)]
pub struct OncePerBook<H> {
    inner: H,
    key: String,
}

impl<H: Handler> Handler for OncePerBook<H> {
    fn handle(&self, ctx: &mut GenerationContext, book: &mut Book) -> Result<(), GenerateError> {
        if book.mark_once(&self.key) {
            return self.inner.handle(ctx, book);
        }
        Ok(())
    }
}

/// Combinators available on every handler
pub trait HandlerExt: Handler + Sized {
    fn then<B: Handler>(self, next: B) -> Then<Self, B> {
        Then { first: self, next }
    }

    fn run_once(self, flag: OnceFlag) -> RunOnce<Self> {
        RunOnce { inner: self, flag }
    }

    fn once_per_book(self, key: impl Into<String>) -> OncePerBook<Self> {
        OncePerBook {
            inner: self,
            key: key.into(),
        }
    }

    fn boxed(self) -> BoxHandler
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<H: Handler> HandlerExt for H {}

/// Fold handlers into one: none is a no-op, one is itself, more are chained
/// left to right with [`HandlerExt::then`].
pub fn handler_of(handlers: Vec<BoxHandler>) -> BoxHandler {
    let mut iter = handlers.into_iter();
    match iter.next() {
        None => Box::new(Noop),
        Some(first) => iter.fold(first, |chain, next| Box::new(chain.then(next)) as BoxHandler),
    }
}
