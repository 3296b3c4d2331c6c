//! Partition of finished jobs into successes and failures

use std::collections::{BTreeMap, BTreeSet};

use crate::core::errors::TranslationError;
use crate::core::models::{Document, TranslationResult};

/// Final outcome of a batch, keyed by language
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: BTreeMap<String, Document>,
    pub failed: BTreeMap<String, TranslationError>,
}

impl BatchReport {
    /// Move a language from succeeded to failed, e.g. when its output could not be saved
    pub fn mark_failed(&mut self, language: &str, error: TranslationError) {
        self.succeeded.remove(language);
        self.failed.insert(language.to_string(), error);
    }

    pub fn failed_languages(&self) -> BTreeSet<&str> {
        self.failed.keys().map(String::as_str).collect()
    }

    pub fn succeeded_languages(&self) -> BTreeSet<&str> {
        self.succeeded.keys().map(String::as_str).collect()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Split results by outcome.
///
/// The output does not depend on the order of `results`.
pub fn partition<I>(results: I) -> BatchReport
where
    I: IntoIterator<Item = TranslationResult>,
{
    let mut report = BatchReport::default();

    for result in results {
        match result.outcome {
            Ok(content) => {
                report.succeeded.insert(result.target_lang, content);
            }
            Err(error) => {
                report.failed.insert(result.target_lang, error);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results() -> Vec<TranslationResult> {
        vec![
            TranslationResult {
                target_lang: "fr".to_string(),
                attempts: 1,
                outcome: Ok(json!({"title": "fr:Hello"})),
            },
            TranslationResult::failed("de", TranslationError::TimeoutError),
            TranslationResult {
                target_lang: "ja".to_string(),
                attempts: 2,
                outcome: Ok(json!({"title": "ja:Hello"})),
            },
            TranslationResult::failed("ko", TranslationError::malformed("not json")),
        ]
    }

    #[test]
    fn test_partition_covers_every_language() {
        let report = partition(results());

        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded_languages(), BTreeSet::from(["fr", "ja"]));
        assert_eq!(report.failed_languages(), BTreeSet::from(["de", "ko"]));
        assert!(report
            .succeeded_languages()
            .is_disjoint(&report.failed_languages()));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_partition_is_order_independent() {
        let forward = partition(results());
        let mut reversed = results();
        reversed.reverse();
        let backward = partition(reversed);

        assert_eq!(forward.succeeded, backward.succeeded);
        assert_eq!(forward.failed_languages(), backward.failed_languages());
    }

    #[test]
    fn test_mark_failed_moves_language() {
        let mut report = partition(results());
        report.mark_failed(
            "fr",
            TranslationError::FileError {
                path: "locales/fr/common.json".to_string(),
                message: "read-only".to_string(),
            },
        );

        assert!(!report.succeeded.contains_key("fr"));
        assert!(report.failed.contains_key("fr"));
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn test_empty_partition() {
        let report = partition(Vec::new());
        assert_eq!(report.total(), 0);
        assert!(report.is_complete());
    }
}
