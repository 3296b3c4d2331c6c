//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::errors::{Result, TranslationError};

/// Parsed localization bundle
pub type Document = serde_json::Value;

/// Lifecycle of a single translation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Waiting behind the admission gate
    Pending,
    /// A backend call is in progress or about to be retried
    Attempting,
    /// Terminal: translation produced
    Succeeded,
    /// Terminal: attempts exhausted or input unusable
    Failed,
}

impl JobState {
    /// Whether no further transitions are allowed
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Attempting => write!(f, "attempting"),
            JobState::Succeeded => write!(f, "succeeded"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// Translation request
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub source_lang: String,
    pub target_lang: String,
    pub content: Arc<Document>,
}

impl TranslationRequest {
    pub fn new(
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        content: Arc<Document>,
    ) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            content,
        }
    }

    /// True when there is nothing worth sending to the backend
    pub fn is_empty(&self) -> bool {
        match self.content.as_ref() {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// A request together with its runtime state, owned by one task
#[derive(Debug)]
pub struct TranslationJob {
    pub request: TranslationRequest,
    pub attempts_made: u32,
    pub last_error: Option<TranslationError>,
    state: JobState,
}

impl TranslationJob {
    pub fn new(request: TranslationRequest) -> Self {
        Self {
            request,
            attempts_made: 0,
            last_error: None,
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Move into `Attempting` and count the attempt
    pub fn begin_attempt(&mut self) {
        debug_assert!(!self.state.is_terminal(), "job already finished");
        self.state = JobState::Attempting;
        self.attempts_made += 1;
    }

    pub fn record_failure(&mut self, error: TranslationError) {
        self.last_error = Some(error);
    }

    /// Consume the job into a success result
    pub fn succeed(mut self, content: Document) -> TranslationResult {
        self.state = JobState::Succeeded;
        TranslationResult {
            target_lang: self.request.target_lang,
            attempts: self.attempts_made,
            outcome: Ok(content),
        }
    }

    /// Consume the job into a failure result carrying the last error
    pub fn fail(mut self) -> TranslationResult {
        self.state = JobState::Failed;
        let error = self.last_error.take().unwrap_or_else(|| {
            TranslationError::InternalError("job failed without an error".to_string())
        });
        TranslationResult {
            target_lang: self.request.target_lang,
            attempts: self.attempts_made,
            outcome: Err(error),
        }
    }
}

/// Translation result
#[derive(Debug)]
pub struct TranslationResult {
    pub target_lang: String,
    pub attempts: u32,
    pub outcome: Result<Document>,
}

impl TranslationResult {
    /// Failure result for a job that never produced one itself
    pub fn failed(target_lang: impl Into<String>, error: TranslationError) -> Self {
        Self {
            target_lang: target_lang.into(),
            attempts: 0,
            outcome: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&TranslationError> {
        self.outcome.as_ref().err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(content: Document) -> TranslationRequest {
        TranslationRequest::new("en", "fr", Arc::new(content))
    }

    #[test]
    fn test_empty_request_detection() {
        assert!(request(json!(null)).is_empty());
        assert!(request(json!({})).is_empty());
        assert!(request(json!([])).is_empty());
        assert!(!request(json!({"title": "Hello"})).is_empty());
    }

    #[test]
    fn test_job_lifecycle() {
        let mut job = TranslationJob::new(request(json!({"a": "b"})));
        assert_eq!(job.state(), JobState::Pending);

        job.begin_attempt();
        assert_eq!(job.state(), JobState::Attempting);
        job.record_failure(TranslationError::TimeoutError);
        job.begin_attempt();
        assert_eq!(job.attempts_made, 2);

        let result = job.succeed(json!({"a": "c"}));
        assert!(result.is_success());
        assert_eq!(result.attempts, 2);
        assert_eq!(result.target_lang, "fr");
    }

    #[test]
    fn test_failed_job_keeps_last_error() {
        let mut job = TranslationJob::new(request(json!({"a": "b"})));
        job.begin_attempt();
        job.record_failure(TranslationError::TimeoutError);
        job.begin_attempt();
        job.record_failure(TranslationError::malformed("not json"));

        let result = job.fail();
        assert!(matches!(
            result.error(),
            Some(TranslationError::MalformedOutputError { .. })
        ));
    }
}
