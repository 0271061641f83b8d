//! End-to-end generation scenarios through the public pipeline API.

use bookgen::book::{Book, Bookshelf, ExportWorkbook, Table};
use bookgen::error::{GenerateError, StorageError};
use bookgen::generator::{
    handler_fn, Dispatch, GenerationContext, Generator, GeneratorRegistry, HandlerExt, OnceFlag,
    Task, EXPORT_TASK_PRIORITY,
};
use bookgen::output::{ExportWriter, WriteOutcome};
use parking_lot::Mutex;
use std::sync::Arc;

type Log = Arc<Mutex<Vec<String>>>;

fn recording(log: &Log, name: &'static str) -> impl bookgen::generator::Handler + 'static {
    let log = Arc::clone(log);
    handler_fn(move |_ctx: &mut GenerationContext, book: &mut Book| {
        log.lock().push(format!("{}:{}", name, book.id));
        Ok(())
    })
}

#[derive(Default)]
struct CountingWriter {
    written: Mutex<Vec<String>>,
}

impl ExportWriter for CountingWriter {
    fn write_export(
        &self,
        book: &Book,
        _workbook: &ExportWorkbook,
    ) -> Result<WriteOutcome, StorageError> {
        self.written.lock().push(book.id.clone());
        Ok(WriteOutcome::Written)
    }
}

#[test]
fn generators_run_in_declared_order_per_book() {
    let log: Log = Arc::default();
    let mut registry = GeneratorRegistry::new();
    registry
        .register("x", recording(&log, "x"))
        .register("y", recording(&log, "y"));
    let generator = Generator::new(registry);

    let mut shelf = Bookshelf::new(vec![
        Book::new("a", "/nonexistent/a").with_generators(["x", "y"]),
        Book::new("b", "/nonexistent/b").with_generators(["x"]),
    ]);
    let summary = generator.run(&mut shelf).unwrap();

    assert_eq!(*log.lock(), vec!["x:a", "y:a", "x:b"]);
    assert_eq!(summary.dispatched, 3);
    assert_eq!(summary.tasks_run, 0);
}

#[test]
fn export_task_runs_once_for_duplicated_book() {
    let writer = Arc::new(CountingWriter::default());
    let mut registry = GeneratorRegistry::new();
    registry.register(
        "codes",
        handler_fn(|_ctx: &mut GenerationContext, book: &mut Book| {
            book.export_mut().put_sheet(Table::new("Opcodes", ["Hex", "Mnemonic"]));
            Ok(())
        }),
    );
    let generator = Generator::with_export_writer(registry, writer.clone());

    let mut shelf = Bookshelf::new(vec![
        Book::new("6502", "/nonexistent/6502").with_generators(["codes"]),
        Book::new("6502", "/nonexistent/6502").with_generators(["codes"]),
    ]);

    let mut ctx = GenerationContext::new();
    generator.generate(&mut ctx, &mut shelf).unwrap();
    assert_eq!(ctx.tasks().pending_priorities(), vec![EXPORT_TASK_PRIORITY]);

    assert_eq!(ctx.drain(&mut shelf).unwrap(), 1);
    assert_eq!(*writer.written.lock(), vec!["6502"]);
    assert!(ctx.tasks().is_empty());
}

#[test]
fn single_book_with_export_schedules_one_task() {
    let writer = Arc::new(CountingWriter::default());
    let mut registry = GeneratorRegistry::new();
    registry.register(
        "codes",
        handler_fn(|_ctx: &mut GenerationContext, book: &mut Book| {
            book.export_mut().put_sheet(Table::new("Opcodes", ["Hex"]));
            Ok(())
        }),
    );
    let generator = Generator::with_export_writer(registry, writer.clone());
    let mut shelf = Bookshelf::new(vec![
        Book::new("6502", "/nonexistent/6502").with_generators(["codes"]),
        Book::new("bbc", "/nonexistent/bbc"),
    ]);

    let summary = generator.run(&mut shelf).unwrap();
    assert_eq!(summary.tasks_run, 1);
    assert_eq!(*writer.written.lock(), vec!["6502"]);
}

#[test]
fn unresolved_generator_leaves_book_untouched() {
    let registry = GeneratorRegistry::new();
    let mut ctx = GenerationContext::new();
    let mut book = Book::new("bbc", "/nonexistent/bbc");

    let outcome = registry.dispatch(&mut ctx, &mut book, "missing").unwrap();
    assert_eq!(outcome, Dispatch::Unresolved);
    assert!(!book.has_export());
    assert_eq!(book.table_names().count(), 0);
    assert!(ctx.tasks().is_empty());
}

#[test]
fn deferred_tasks_run_after_all_books_and_by_priority() {
    let log: Log = Arc::default();
    let mut registry = GeneratorRegistry::new();
    let handler_log = Arc::clone(&log);
    registry.register(
        "schedule",
        handler_fn(move |ctx: &mut GenerationContext, book: &mut Book| {
            handler_log.lock().push(format!("generate:{}", book.id));
            let late = Arc::clone(&handler_log);
            let early = Arc::clone(&handler_log);
            let id = book.id.clone();
            let early_id = id.clone();
            ctx.add_task(Task::new(format!("late {}", id), move || {
                late.lock().push(format!("late:{}", id));
                Ok(())
            }));
            ctx.add_priority_task(
                1,
                Task::for_book(format!("early {}", early_id), early_id.clone(), move |book| {
                    early.lock().push(format!("early:{}", book.id));
                    Ok(())
                }),
            );
            Ok(())
        }),
    );
    let generator = Generator::new(registry);
    let mut shelf = Bookshelf::new(vec![
        Book::new("a", "/nonexistent/a").with_generators(["schedule"]),
        Book::new("b", "/nonexistent/b").with_generators(["schedule"]),
    ]);

    generator.run(&mut shelf).unwrap();
    assert_eq!(
        *log.lock(),
        vec![
            "generate:a",
            "generate:b",
            "early:a",
            "early:b",
            "late:a",
            "late:b"
        ]
    );
}

#[test]
fn failing_task_stops_drain() {
    let log: Log = Arc::default();
    let mut registry = GeneratorRegistry::new();
    let handler_log = Arc::clone(&log);
    registry.register(
        "tasks",
        handler_fn(move |ctx: &mut GenerationContext, _book: &mut Book| {
            for (i, fails) in [false, true, false].into_iter().enumerate() {
                let log = Arc::clone(&handler_log);
                ctx.add_task(Task::new(format!("task {}", i), move || {
                    log.lock().push(format!("task {}", i));
                    if fails {
                        Err(GenerateError::handler("a", "tasks", "boom"))
                    } else {
                        Ok(())
                    }
                }));
            }
            Ok(())
        }),
    );
    let generator = Generator::new(registry);
    let mut shelf = Bookshelf::new(vec![
        Book::new("a", "/nonexistent/a").with_generators(["tasks"])
    ]);

    let err = generator.run(&mut shelf).unwrap_err();
    assert!(matches!(err, GenerateError::Task { ref label, .. } if label == "task 1"));
    assert_eq!(*log.lock(), vec!["task 0", "task 1"]);
}

#[test]
fn run_once_chain_fires_once_across_books() {
    let log: Log = Arc::default();
    let flag = OnceFlag::new();
    let mut registry = GeneratorRegistry::new();
    registry.register("setup", recording(&log, "setup").run_once(flag.clone()));
    let generator = Generator::new(registry);
    let mut shelf = Bookshelf::new(vec![
        Book::new("a", "/nonexistent/a").with_generators(["setup"]),
        Book::new("b", "/nonexistent/b").with_generators(["setup"]),
    ]);

    generator.run(&mut shelf).unwrap();
    assert_eq!(*log.lock(), vec!["setup:a"]);
    assert!(flag.is_set());
}

#[test]
#[should_panic(expected = "already registered")]
fn duplicate_registration_is_fatal() {
    let log: Log = Arc::default();
    let mut registry = GeneratorRegistry::new();
    registry.register("x", recording(&log, "x"));
    registry.register("x", recording(&log, "x"));
}
