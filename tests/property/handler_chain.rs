//! Property-based tests for handler composition

use bookgen::book::Book;
use bookgen::error::GenerateError;
use bookgen::generator::{
    handler_fn, handler_of, BoxHandler, GenerationContext, Handler, HandlerExt, Noop, OnceFlag,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

type Log = Arc<Mutex<Vec<usize>>>;

/// Step `i` records itself, then fails when `fails` is set
fn step(log: &Log, i: usize, fails: bool) -> BoxHandler {
    let log = Arc::clone(log);
    handler_fn(move |_ctx: &mut GenerationContext, book: &mut Book| {
        log.lock().push(i);
        if fails {
            Err(GenerateError::handler(&book.id, "step", format!("step {} failed", i)))
        } else {
            Ok(())
        }
    })
    .boxed()
}

fn run(handler: &dyn Handler) -> bool {
    let mut ctx = GenerationContext::new();
    let mut book = Book::new("prop", "/nonexistent/prop");
    handler.handle(&mut ctx, &mut book).is_ok()
}

proptest! {
    /// Folding a list of steps behaves exactly like threading `then` by hand
    #[test]
    fn handler_of_matches_manual_then(failures in prop::collection::vec(any::<bool>(), 1..12)) {
        let folded_log: Log = Arc::default();
        let folded = handler_of(
            failures.iter().enumerate().map(|(i, f)| step(&folded_log, i, *f)).collect(),
        );

        let manual_log: Log = Arc::default();
        let manual = failures
            .iter()
            .enumerate()
            .map(|(i, f)| step(&manual_log, i, *f))
            .fold(Noop.boxed(), |chain, next| chain.then(next).boxed());

        prop_assert_eq!(run(&*folded), run(&*manual));
        prop_assert_eq!(&*folded_log.lock(), &*manual_log.lock());
    }

    /// Steps after the first failing step never run
    #[test]
    fn chain_stops_at_first_failure(len in 1usize..12, fail_at in 0usize..12) {
        let log: Log = Arc::default();
        let chain = handler_of((0..len).map(|i| step(&log, i, i == fail_at)).collect());

        let ok = run(&*chain);
        let expected: Vec<usize> = (0..len.min(fail_at + 1)).collect();
        prop_assert_eq!(ok, fail_at >= len);
        prop_assert_eq!(&*log.lock(), &expected);
    }

    /// A run-once chain fires once per flag however often it is invoked
    #[test]
    fn run_once_fires_once_per_flag(invocations in 1usize..6, flags in 1usize..4) {
        let log: Log = Arc::default();
        for f in 0..flags {
            let chain = step(&log, f, false).run_once(OnceFlag::new());
            for _ in 0..invocations {
                prop_assert!(run(&chain));
            }
        }
        prop_assert_eq!(&*log.lock(), &(0..flags).collect::<Vec<_>>());
    }
}
