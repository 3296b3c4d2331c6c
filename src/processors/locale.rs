//! Loading and saving JSON locale bundles

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::errors::{Result, TranslationError};
use crate::core::models::Document;

/// Provides the source document, once per run
#[async_trait]
pub trait SourceLoader: Send + Sync {
    async fn load(&self) -> Result<Document>;
}

/// Persists one translated document per language
#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn save(&self, language: &str, content: &Document) -> Result<()>;
}

/// Reads the source bundle from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SourceLoader for JsonFileLoader {
    async fn load(&self) -> Result<Document> {
        debug!("Loading source: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TranslationError::config(format!(
                "cannot read source file {}: {}",
                self.path.display(),
                e
            )))?;

        let document: Document = serde_json::from_str(&content).map_err(|e| {
            TranslationError::config(format!(
                "cannot parse source file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        info!("Loaded source bundle: {}", self.path.display());
        Ok(document)
    }
}

/// Writes `<root>/<language>/<file_name>` as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    root: PathBuf,
    file_name: String,
}

impl JsonFileWriter {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Output location for a language
    pub fn path_for(&self, language: &str) -> PathBuf {
        self.root.join(language).join(&self.file_name)
    }
}

fn file_error(path: &Path, e: impl ToString) -> TranslationError {
    TranslationError::FileError {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl OutputWriter for JsonFileWriter {
    async fn save(&self, language: &str, content: &Document) -> Result<()> {
        let output = self.path_for(language);

        // Ensure output directory exists
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| file_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(content).map_err(|e| file_error(&output, e))?;

        if tokio::fs::try_exists(&output).await.unwrap_or(false) {
            info!("Overwriting existing file: {}", output.display());
        }

        tokio::fs::write(&output, json)
            .await
            .map_err(|e| file_error(&output, e))?;

        info!("Saved {} translation to {}", language, output.display());
        Ok(())
    }
}
