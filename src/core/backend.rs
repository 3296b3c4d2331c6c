//! Translation backend abstraction

use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::errors::Result;
use crate::core::models::Document;

/// Anything that can translate a whole document from one language to another.
///
/// Implementations own serialization, transport and response validation: a
/// returned document must already have the same structural shape as the
/// input. Every failure is reported as an error, never as a partial document.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    async fn translate(
        &self,
        content: &Document,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Document>;
}
