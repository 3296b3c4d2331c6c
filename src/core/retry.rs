//! Per-language job execution with retry

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::core::backend::TranslationBackend;
use crate::core::errors::TranslationError;
use crate::core::models::{TranslationJob, TranslationRequest, TranslationResult};

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed,
    /// Delay doubles after each failed attempt
    Exponential,
}

/// Retry settings for one job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. `1` means no retry.
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// Fixed-delay policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            backoff: Backoff::Fixed,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(factor)
            }
        }
    }

    /// Wait before the next attempt, stretched to honour a server `Retry-After`
    pub fn wait_after(&self, attempt: u32, error: &TranslationError) -> Duration {
        let delay = self.delay_after(attempt);
        match error {
            TranslationError::RateLimitError {
                retry_after: Some(seconds),
            } => delay.max(Duration::from_secs(*seconds)),
            _ => delay,
        }
    }
}

/// Run one translation job to a terminal state.
///
/// Attempts run strictly in sequence. The first success is returned
/// immediately; on exhaustion the result carries the last backend error.
/// Never returns an error itself, failures are encoded in the result.
pub async fn attempt<B>(
    request: TranslationRequest,
    policy: RetryPolicy,
    backend: &B,
) -> TranslationResult
where
    B: TranslationBackend + ?Sized,
{
    let mut job = TranslationJob::new(request);
    let language = job.request.target_lang.clone();

    if job.request.is_empty() {
        warn!("Nothing to translate for {}", language);
        job.record_failure(TranslationError::EmptyInputError { language });
        return job.fail();
    }

    loop {
        job.begin_attempt();
        let attempt = job.attempts_made;
        debug!(
            "Translating {} (attempt {}/{})",
            language, attempt, policy.max_attempts
        );

        let outcome = backend
            .translate(
                &job.request.content,
                &job.request.source_lang,
                &job.request.target_lang,
            )
            .await;

        match outcome {
            Ok(content) => {
                if attempt > 1 {
                    info!("Translated {} after {} attempts", language, attempt);
                }
                return job.succeed(content);
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt, policy.max_attempts, language, e
                );
                let retryable = e.is_retryable();
                let wait = policy.wait_after(attempt, &e);
                job.record_failure(e);

                if !retryable || attempt >= policy.max_attempts {
                    return job.fail();
                }

                sleep(wait).await;
            }
        }
    }
}
