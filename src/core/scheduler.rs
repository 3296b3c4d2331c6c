//! Bounded-parallelism fan-out over target languages

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationResult;
use crate::core::progress::ProgressReporter;

/// Runs one job per target language with at most `concurrency_limit` in flight
#[derive(Clone)]
pub struct Scheduler {
    concurrency_limit: usize,
    progress: Option<Arc<ProgressReporter>>,
}

impl Scheduler {
    /// Create a scheduler. A zero limit is a configuration error.
    pub fn new(concurrency_limit: usize) -> Result<Self> {
        if concurrency_limit == 0 {
            return Err(TranslationError::config(
                "concurrency limit must be greater than 0",
            ));
        }

        Ok(Self {
            concurrency_limit,
            progress: None,
        })
    }

    /// Report every finished job to `progress`. Its total must match the
    /// number of languages passed to `run`.
    pub fn with_progress(mut self, progress: Arc<ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run `job_fn` once per language and collect every result.
    ///
    /// A slot is acquired before each task is spawned and released when the
    /// task ends, however it ends. Returns once all tasks have finished, with
    /// exactly one result per language in input order. A task that panics
    /// yields a failure result for its language.
    pub async fn run<F, Fut>(
        &self,
        languages: &[String],
        job_fn: F,
    ) -> Result<Vec<TranslationResult>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = TranslationResult> + Send + 'static,
    {
        validate_targets(languages)?;

        if let Some(progress) = &self.progress {
            let total_jobs = progress.state().await.total_jobs;
            if total_jobs != languages.len() {
                return Err(TranslationError::config(format!(
                    "progress expects {} jobs but {} languages were given",
                    total_jobs,
                    languages.len()
                )));
            }
        }

        info!(
            "Scheduling {} jobs with concurrency {}",
            languages.len(),
            self.concurrency_limit
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut handles = Vec::with_capacity(languages.len());

        for language in languages {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| TranslationError::InternalError(e.to_string()))?;

            debug!("Dispatching job for {}", language);
            let job = job_fn(language.clone());
            let progress = self.progress.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = job.await;
                if let Some(progress) = progress {
                    progress.record(&result.target_lang, result.error()).await;
                }
                result
            });

            handles.push((language.clone(), handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (language, handle) in handles {
            let result = match handle.await {
                Ok(result) => {
                    debug_assert_eq!(result.target_lang, language, "result for wrong language");
                    result
                }
                Err(e) => {
                    error!("Job for {} did not finish: {}", language, e);
                    let failure = TranslationError::InternalError(format!("job task failed: {}", e));
                    if let Some(progress) = &self.progress {
                        progress.record(&language, Some(&failure)).await;
                    }
                    TranslationResult::failed(language, failure)
                }
            };
            results.push(result);
        }

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        Ok(results)
    }
}

/// Target list must be non-empty and free of duplicates
pub fn validate_targets(languages: &[String]) -> Result<()> {
    if languages.is_empty() {
        return Err(TranslationError::config("no target languages given"));
    }

    let mut seen = HashSet::with_capacity(languages.len());
    for language in languages {
        if language.trim().is_empty() {
            return Err(TranslationError::config("empty target language code"));
        }
        if !seen.insert(language.as_str()) {
            return Err(TranslationError::config(format!(
                "duplicate target language: {}",
                language
            )));
        }
    }

    Ok(())
}
