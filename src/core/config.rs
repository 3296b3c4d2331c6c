//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::core::retry::{Backoff, RetryPolicy};

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub source_lang: String,
    pub source_file: PathBuf,
    pub output_dir: PathBuf,
    pub output_file_name: String,
    pub max_concurrent: usize,
    /// Total attempts per language, the first one included
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub exponential_backoff: bool,
    pub timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            source_lang: "en".to_string(),
            source_file: PathBuf::from("locales/en/common.json"),
            output_dir: PathBuf::from("locales"),
            output_file_name: "common.json".to_string(),
            max_concurrent: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
            exponential_backoff: false,
            timeout_ms: 120_000,
        }
    }
}

/// Read an env var, falling back to `default` when unset
fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

impl TranslatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable is required"))?;

        let api_endpoint = env_or("API_ENDPOINT", defaults.api_endpoint);
        let model = env_or("MODEL", defaults.model);

        let temperature = env_or("TEMPERATURE", defaults.temperature.to_string()).parse::<f32>()?;

        let source_lang = env_or("SOURCE_LANG", defaults.source_lang);

        let source_file = std::env::var("SOURCE_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.source_file);

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let output_file_name = env_or("OUTPUT_FILE_NAME", defaults.output_file_name);

        let max_concurrent = env_or("MAX_CONCURRENT", defaults.max_concurrent.to_string())
            .parse::<usize>()?;

        let max_retries = env_or("MAX_RETRIES", defaults.max_retries.to_string()).parse::<u32>()?;

        let retry_delay_ms = env_or("RETRY_DELAY_MS", defaults.retry_delay_ms.to_string())
            .parse::<u64>()?;

        let exponential_backoff = env_or("EXPONENTIAL_BACKOFF", "false".to_string())
            .parse::<bool>()?;

        let timeout_ms = env_or("REQUEST_TIMEOUT_MS", defaults.timeout_ms.to_string())
            .parse::<u64>()?;

        Ok(Self {
            api_key,
            api_endpoint,
            model,
            temperature,
            source_lang,
            source_file,
            output_dir,
            output_file_name,
            max_concurrent,
            max_retries,
            retry_delay_ms,
            exponential_backoff,
            timeout_ms,
        })
    }

    /// Load from a config file (JSON, TOML or YAML), with `TRANSLATOR_*`
    /// environment variables layered on top
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut config: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("TRANSLATOR").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                config.api_key = key;
            }
        }

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            return Err(anyhow::anyhow!("API key is required"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.max_concurrent == 0 {
            return Err(anyhow::anyhow!("max_concurrent must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(anyhow::anyhow!("max_retries must be at least 1"));
        }

        if self.output_file_name.is_empty() {
            return Err(anyhow::anyhow!("output_file_name must not be empty"));
        }

        if self.max_concurrent > 100 {
            warn!(
                "max_concurrent = {} may trip provider rate limits",
                self.max_concurrent
            );
        }

        Ok(())
    }

    /// Retry policy derived from the retry settings
    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.exponential_backoff {
            Backoff::Exponential
        } else {
            Backoff::Fixed
        };

        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
            .with_backoff(backoff)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_validation() {
        let config = TranslatorConfig {
            api_key: "test_key".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = TranslatorConfig {
            api_key: "".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_limits() {
        let config = TranslatorConfig {
            api_key: "test_key".to_string(),
            max_concurrent: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TranslatorConfig {
            api_key: "test_key".to_string(),
            max_retries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = TranslatorConfig {
            max_retries: 2,
            retry_delay_ms: 250,
            exponential_backoff: true,
            ..Default::default()
        };

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.delay, Duration::from_millis(250));
        assert_eq!(policy.backoff, Backoff::Exponential);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"api_key": "file_key", "max_concurrent": 4, "model": "gpt-4o-mini"}}"#
        )
        .unwrap();

        let config = TranslatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key, "file_key");
        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.output_file_name, "common.json");
    }
}
