//! Progress tracking across concurrently completing jobs

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::errors::TranslationError;
use crate::core::languages::LanguageRegistry;

/// Counters shared by all jobs of a run, also handed out as snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub total_jobs: usize,
    pub completed: usize,
    pub succeeded: usize,
}

impl ProgressState {
    pub fn failed(&self) -> usize {
        self.completed - self.succeeded
    }

    pub fn percentage(&self) -> f64 {
        if self.total_jobs == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total_jobs as f64 * 100.0
    }
}

/// Presentation of progress updates.
///
/// Called while the reporter lock is held, so calls never interleave.
pub trait ProgressSink: Send + Sync {
    fn report(
        &self,
        snapshot: &ProgressState,
        language: &str,
        display_name: &str,
        error: Option<&TranslationError>,
    );

    /// Called once after the last job
    fn finish(&self) {}
}

/// Sink that discards updates
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _: &ProgressState, _: &str, _: &str, _: Option<&TranslationError>) {}
}

/// Terminal progress bar plus a log line per finished language
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total_jobs: usize) -> Self {
        Self::with_bar(ProgressBar::new(total_jobs as u64))
    }

    /// Use an existing bar, e.g. one with a hidden draw target
    pub fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        Self { bar }
    }
}

impl ProgressSink for ConsoleProgress {
    fn report(
        &self,
        snapshot: &ProgressState,
        language: &str,
        display_name: &str,
        error: Option<&TranslationError>,
    ) {
        let label = format!("{} ({})", display_name, language);
        self.bar.set_position(snapshot.completed as u64);

        // Log lines are printed with the bar cleared, then the bar is redrawn
        match error {
            None => {
                self.bar.set_message(format!("Done: {}", label));
                self.bar.suspend(|| {
                    info!(
                        "[{}/{}] {} translated ({:.1}%, {} ok, {} failed)",
                        snapshot.completed,
                        snapshot.total_jobs,
                        label,
                        snapshot.percentage(),
                        snapshot.succeeded,
                        snapshot.failed()
                    )
                });
            }
            Some(e) => {
                self.bar.set_message(format!("Failed: {}", label));
                self.bar.suspend(|| {
                    warn!(
                        "[{}/{}] {} failed ({:.1}%, {} ok, {} failed): {}",
                        snapshot.completed,
                        snapshot.total_jobs,
                        label,
                        snapshot.percentage(),
                        snapshot.succeeded,
                        snapshot.failed(),
                        e
                    )
                });
            }
        }
    }

    fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }
}

/// Mutex-guarded progress counters feeding a sink
pub struct ProgressReporter {
    state: Mutex<ProgressState>,
    sink: Box<dyn ProgressSink>,
    languages: Arc<LanguageRegistry>,
}

impl ProgressReporter {
    pub fn new(total_jobs: usize, sink: Box<dyn ProgressSink>) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                total_jobs,
                ..Default::default()
            }),
            sink,
            languages: Arc::new(LanguageRegistry::default()),
        }
    }

    /// Resolve display names from `languages`; without it the raw code is shown
    pub fn with_languages(mut self, languages: Arc<LanguageRegistry>) -> Self {
        self.languages = languages;
        self
    }

    /// Reporter without any output
    pub fn silent(total_jobs: usize) -> Self {
        Self::new(total_jobs, Box::new(NoopProgress))
    }

    /// Count one finished job and report it.
    ///
    /// The increment and the sink call happen under the same lock.
    pub async fn record(
        &self,
        language: &str,
        error: Option<&TranslationError>,
    ) -> ProgressState {
        let mut state = self.state.lock().await;

        debug_assert!(state.completed < state.total_jobs, "more completions than jobs");
        state.completed += 1;
        if error.is_none() {
            state.succeeded += 1;
        }

        let snapshot = *state;
        let display_name = self.languages.display_name(language);
        self.sink.report(&snapshot, language, display_name, error);

        snapshot
    }

    pub async fn state(&self) -> ProgressState {
        *self.state.lock().await
    }

    pub fn finish(&self) {
        self.sink.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    /// Keeps every snapshot it receives
    #[derive(Default)]
    struct RecordingSink {
        seen: Arc<StdMutex<Vec<(ProgressState, String, bool)>>>,
        names: Arc<StdMutex<Vec<String>>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(
            &self,
            snapshot: &ProgressState,
            language: &str,
            display_name: &str,
            error: Option<&TranslationError>,
        ) {
            self.seen
                .lock()
                .unwrap()
                .push((*snapshot, language.to_string(), error.is_none()));
            self.names.lock().unwrap().push(display_name.to_string());
        }
    }

    #[tokio::test]
    async fn test_sequential_recording() {
        let sink = RecordingSink::default();
        let seen = sink.seen.clone();
        let reporter = ProgressReporter::new(2, Box::new(sink));

        let first = reporter.record("fr", None).await;
        let second = reporter
            .record("de", Some(&TranslationError::TimeoutError))
            .await;

        assert_eq!((first.completed, first.succeeded), (1, 1));
        assert_eq!((second.completed, second.succeeded), (2, 1));
        assert_eq!(second.failed(), 1);
        assert_eq!(second.percentage(), 100.0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].1, "de");
        assert!(!seen[1].2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_recording_is_consistent() {
        let total = 64;
        let sink = RecordingSink::default();
        let seen = sink.seen.clone();
        let reporter = Arc::new(ProgressReporter::new(total, Box::new(sink)));

        let mut handles = Vec::new();
        for i in 0..total {
            let reporter = reporter.clone();
            handles.push(tokio::spawn(async move {
                let error = (i % 3 == 0).then_some(TranslationError::TimeoutError);
                reporter.record(&format!("l{}", i), error.as_ref()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let state = reporter.state().await;
        assert_eq!(state.completed, total);
        assert_eq!(state.succeeded, total - (0..total).filter(|i| i % 3 == 0).count());

        // Snapshots are observed in lock order: completed strictly increases.
        let seen = seen.lock().unwrap();
        for (i, (snapshot, _, _)) in seen.iter().enumerate() {
            assert_eq!(snapshot.completed, i + 1);
            assert!(snapshot.succeeded <= snapshot.completed);
        }
    }

    #[tokio::test]
    async fn test_sink_receives_display_names() {
        let sink = RecordingSink::default();
        let names = sink.names.clone();
        let reporter = ProgressReporter::new(2, Box::new(sink))
            .with_languages(Arc::new(LanguageRegistry::from_pairs([("fr", "French")])));

        reporter.record("fr", None).await;
        reporter.record("xx", None).await;

        assert_eq!(*names.lock().unwrap(), vec!["French", "xx"]);
    }

    #[tokio::test]
    async fn test_console_progress_tracks_bar() {
        let bar = ProgressBar::hidden();
        let reporter = ProgressReporter::new(2, Box::new(ConsoleProgress::with_bar(bar.clone())))
            .with_languages(Arc::new(LanguageRegistry::builtin()));

        reporter.record("fr", None).await;
        assert_eq!(bar.position(), 1);
        assert_eq!(bar.message(), "Done: French (fr)");

        reporter
            .record("de", Some(&TranslationError::TimeoutError))
            .await;
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "Failed: German (de)");

        reporter.finish();
        assert!(bar.is_finished());
    }

    #[test]
    fn test_percentage_of_empty_run() {
        let snapshot = ProgressState::default();
        assert_eq!(snapshot.percentage(), 100.0);
    }
}
