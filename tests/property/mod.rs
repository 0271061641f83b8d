//! Property-based tests for handler composition and task ordering

mod handler_chain;
mod task_queue;
