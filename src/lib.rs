//! Locale Batch Translator - concurrent translation of JSON localization bundles
//!
//! This library fans a source bundle out to many target languages through an
//! LLM translation backend, with bounded concurrency, per-language retries and
//! a partial-failure report.

#![forbid(unsafe_code)]

pub mod core;
pub mod processors;
pub mod cli;

// Re-export key types for convenience
pub use crate::core::{
    aggregator::{partition, BatchReport},
    backend::TranslationBackend,
    client::OpenAiBackend,
    config::TranslatorConfig,
    errors::{ErrorKind, TranslationError},
    languages::LanguageRegistry,
    models::{Document, JobState, TranslationJob, TranslationRequest, TranslationResult},
    pipeline::{BatchTranslator, RunSummary},
    progress::{ProgressReporter, ProgressSink, ProgressState},
    retry::{Backoff, RetryPolicy},
    scheduler::Scheduler,
};

pub use crate::processors::locale::{JsonFileLoader, JsonFileWriter, OutputWriter, SourceLoader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
