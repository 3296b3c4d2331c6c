//! Custom error types for translation operations

use std::fmt;
use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after:?} seconds")]
    RateLimitError {
        retry_after: Option<u64>,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Reply could not be parsed back into a document of the expected shape
    #[error("Malformed output: {message}")]
    MalformedOutputError {
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Nothing to translate
    #[error("Empty input for language {language}")]
    EmptyInputError {
        language: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        path: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse classification used for propagation decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal, aborts the run before scheduling
    Config,
    /// Backend failure, retried
    Backend,
    /// Output could not be written
    Persistence,
    /// Job had no content
    EmptyInput,
    /// Anything else, contained per job
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::Backend => write!(f, "backend"),
            ErrorKind::Persistence => write!(f, "persistence"),
            ErrorKind::EmptyInput => write!(f, "empty-input"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

impl TranslationError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        TranslationError::ConfigError {
            message: message.into(),
        }
    }

    /// Shorthand for a malformed-output error
    pub fn malformed(message: impl Into<String>) -> Self {
        TranslationError::MalformedOutputError {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslationError::ConfigError { .. } => ErrorKind::Config,
            TranslationError::ApiError { .. }
            | TranslationError::RateLimitError { .. }
            | TranslationError::NetworkError { .. }
            | TranslationError::InvalidResponseError { .. }
            | TranslationError::MalformedOutputError { .. }
            | TranslationError::TimeoutError
            | TranslationError::JsonError(_) => ErrorKind::Backend,
            TranslationError::FileError { .. } => ErrorKind::Persistence,
            TranslationError::EmptyInputError { .. } => ErrorKind::EmptyInput,
            TranslationError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Backend | ErrorKind::Internal)
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::TimeoutError
        } else {
            TranslationError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
