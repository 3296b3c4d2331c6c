//! OpenAI-compatible chat completions backend

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::backend::TranslationBackend;
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::languages::LanguageRegistry;
use crate::core::models::Document;

/// Translation backend talking to an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
    languages: Arc<LanguageRegistry>,
    code_fence: Regex,
}

impl OpenAiBackend {
    /// Create a new backend
    pub fn new(config: TranslatorConfig, languages: Arc<LanguageRegistry>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| TranslationError::config(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(config.max_concurrent)
            .build()?;

        let code_fence = Regex::new(r"```(?:json)?\n?|\n?```")
            .map_err(|e| TranslationError::InternalError(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
            languages,
            code_fence,
        })
    }

    /// Prompt asking the model to translate a JSON bundle
    fn build_prompt(&self, payload: &str, source_lang: &str, target_lang: &str) -> String {
        format!(
            "Translate the values of the following JSON from {} ({}) to {} ({}).\n\
             Keep the JSON structure and keys unchanged and translate only the values.\n\
             Preserve placeholders such as {{name}}, HTML tags, line breaks and numbers.\n\
             Return ONLY the raw JSON, without markdown formatting or code blocks.\n\n\
             {}",
            self.languages.display_name(source_lang),
            source_lang,
            self.languages.display_name(target_lang),
            target_lang,
            payload
        )
    }

    /// Strip incidental code fences and validate the reply against the input shape
    fn parse_reply(&self, reply: &str, original: &Document) -> Result<Document> {
        let cleaned = self.code_fence.replace_all(reply, "");
        let cleaned = cleaned.trim();

        let parsed: Document = serde_json::from_str(cleaned).map_err(|e| {
            TranslationError::malformed(format!("reply is not valid JSON ({}): {}", e, cleaned))
        })?;

        let same_shape = match (original, &parsed) {
            (Document::Object(_), Document::Object(_)) => true,
            (Document::Array(_), Document::Array(_)) => true,
            (Document::Object(_), _) | (Document::Array(_), _) => false,
            _ => true,
        };

        if !same_shape {
            return Err(TranslationError::malformed(format!(
                "reply has a different structure than the source: {}",
                cleaned
            )));
        }

        Ok(parsed)
    }

    /// Send actual HTTP request
    async fn send_request(&self, prompt: String) -> Result<String> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": prompt
            }],
            "temperature": self.config.temperature
        });

        let response = self
            .client
            .post(&self.config.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value = response
                .json()
                .await
                .map_err(|e| TranslationError::InvalidResponseError {
                    message: e.to_string(),
                })?;

            let reply = json["choices"]
                .get(0)
                .and_then(|c| c["message"]["content"].as_str())
                .ok_or_else(|| TranslationError::InvalidResponseError {
                    message: "No translation in response".to_string(),
                })?
                .to_string();

            if let Some(tokens) = json["usage"]["total_tokens"].as_u64() {
                debug!("Request used {} tokens", tokens);
            }

            Ok(reply)
        } else {
            let headers = response.headers().clone();
            let error_text = response.text().await.unwrap_or_default();

            Err(classify_failure(status, &headers, error_text))
        }
    }
}

/// Map a non-success HTTP reply to a backend error.
///
/// 429 becomes `RateLimitError` carrying a numeric `Retry-After` (seconds)
/// when the server sends one. Anything else is an `ApiError` with the body.
pub fn classify_failure(
    status: StatusCode,
    headers: &HeaderMap,
    body: String,
) -> TranslationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return TranslationError::RateLimitError { retry_after };
    }

    TranslationError::ApiError {
        status: status.as_u16(),
        message: body,
    }
}

#[async_trait]
impl TranslationBackend for OpenAiBackend {
    async fn translate(
        &self,
        content: &Document,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Document> {
        let payload = serde_json::to_string(content)?;
        let prompt = self.build_prompt(&payload, source_lang, target_lang);

        debug!(
            "Requesting {} -> {} ({} bytes)",
            source_lang,
            target_lang,
            payload.len()
        );

        let reply = self.send_request(prompt).await?;
        debug!("Reply for {}: {}", target_lang, reply);

        self.parse_reply(&reply, content)
    }
}
