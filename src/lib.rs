//! bookgen: documentation book generation pipeline
//!
//! Runs a configured list of named generators over every book of a
//! documentation site, then drains the finishing tasks those generators
//! scheduled in priority order, and finally renders each book to PDF.

pub mod book;
pub mod builtin;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod pdf;
pub mod queue;
