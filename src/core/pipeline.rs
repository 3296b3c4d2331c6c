//! Load, translate, aggregate and persist a batch

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::core::aggregator::{partition, BatchReport};
use crate::core::backend::TranslationBackend;
use crate::core::errors::Result;
use crate::core::languages::LanguageRegistry;
use crate::core::models::TranslationRequest;
use crate::core::progress::{ConsoleProgress, NoopProgress, ProgressReporter, ProgressSink};
use crate::core::retry::{self, RetryPolicy};
use crate::core::scheduler::{validate_targets, Scheduler};
use crate::processors::locale::{OutputWriter, SourceLoader};

/// Outcome of a whole run
#[derive(Debug)]
pub struct RunSummary {
    pub report: BatchReport,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        self.report.is_complete()
    }

    pub fn failure_count(&self) -> usize {
        self.report.failed.len()
    }
}

/// Batch translator wiring loader, backend and writer around the scheduler
pub struct BatchTranslator {
    backend: Arc<dyn TranslationBackend>,
    loader: Box<dyn SourceLoader>,
    writer: Box<dyn OutputWriter>,
    languages: Arc<LanguageRegistry>,
    retry_policy: RetryPolicy,
    concurrency_limit: usize,
    console_progress: bool,
}

impl BatchTranslator {
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        loader: Box<dyn SourceLoader>,
        writer: Box<dyn OutputWriter>,
        languages: Arc<LanguageRegistry>,
    ) -> Self {
        Self {
            backend,
            loader,
            writer,
            languages,
            retry_policy: RetryPolicy::default(),
            concurrency_limit: 30,
            console_progress: false,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Draw a progress bar on the terminal while jobs run
    pub fn with_console_progress(mut self, enabled: bool) -> Self {
        self.console_progress = enabled;
        self
    }

    /// Translate the source bundle into every target language.
    ///
    /// Configuration problems (bad limits or target list, unreadable source)
    /// abort before any job starts. Everything else is contained per
    /// language and shows up in the report.
    pub async fn run(&self, source_lang: &str, targets: &[String]) -> Result<RunSummary> {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();

        validate_targets(targets)?;
        let scheduler = Scheduler::new(self.concurrency_limit)?;

        let content = Arc::new(self.loader.load().await?);

        let sink: Box<dyn ProgressSink> = if self.console_progress {
            Box::new(ConsoleProgress::new(targets.len()))
        } else {
            Box::new(NoopProgress)
        };
        let progress = Arc::new(
            ProgressReporter::new(targets.len(), sink).with_languages(self.languages.clone()),
        );
        let scheduler = scheduler.with_progress(progress);

        info!(
            "Translating {} -> {} languages",
            self.languages.label(source_lang),
            targets.len()
        );

        let policy = self.retry_policy;
        let results = scheduler
            .run(targets, |target| {
                let backend = self.backend.clone();
                let request = TranslationRequest::new(source_lang, target, content.clone());
                async move { retry::attempt(request, policy, backend.as_ref()).await }
            })
            .await?;

        let mut report = partition(results);

        let saved: Vec<String> = report.succeeded.keys().cloned().collect();
        for language in saved {
            let outcome = match report.succeeded.get(&language) {
                Some(content) => self.writer.save(&language, content).await,
                None => continue,
            };

            if let Err(e) = outcome {
                warn!("Could not save {}: {}", self.languages.label(&language), e);
                report.mark_failed(&language, e);
            }
        }

        let elapsed = start_time.elapsed();
        info!(
            "Completed: {} succeeded, {} failed in {:?}",
            report.succeeded.len(),
            report.failed.len(),
            elapsed
        );

        Ok(RunSummary {
            report,
            started_at,
            elapsed,
        })
    }
}
