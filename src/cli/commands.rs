//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::core::client::OpenAiBackend;
use crate::core::config::TranslatorConfig;
use crate::core::languages::LanguageRegistry;
use crate::core::pipeline::{BatchTranslator, RunSummary};
use crate::processors::locale::{JsonFileLoader, JsonFileWriter};

/// Commands for Locale Batch Translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a JSON locale bundle into several languages
    Translate {
        /// Source JSON file (default: locales/en/common.json)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Root directory for translated bundles (default: locales)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File name written inside each language directory (default: common.json)
        #[arg(long)]
        file_name: Option<String>,

        /// Source language code (default: en)
        #[arg(long)]
        source_lang: Option<String>,

        /// Comma separated target language codes
        #[arg(short, long, value_delimiter = ',')]
        targets: Vec<String>,

        /// Translate into every known language except the source
        #[arg(long, conflicts_with = "targets")]
        all: bool,

        /// Total attempts per language (1 = no retry)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Delay between attempts in milliseconds
        #[arg(long)]
        retry_delay_ms: Option<u64>,

        /// Double the delay after every failed attempt
        #[arg(long)]
        exponential_backoff: bool,
    },

    /// List known language codes
    Languages,
}

/// Overrides from the `translate` command line
#[derive(Debug, Default)]
pub struct TranslateOptions {
    pub file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub source_lang: Option<String>,
    pub targets: Vec<String>,
    pub all: bool,
    pub max_concurrent: Option<usize>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub exponential_backoff: bool,
}

impl TranslateOptions {
    /// Apply command line values on top of the loaded configuration
    pub fn apply(&self, config: &mut TranslatorConfig) {
        if let Some(file) = &self.file {
            config.source_file = file.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(name) = &self.file_name {
            config.output_file_name = name.clone();
        }
        if let Some(lang) = &self.source_lang {
            config.source_lang = lang.clone();
        }
        if let Some(limit) = self.max_concurrent {
            config.max_concurrent = limit;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry_delay_ms = delay;
        }
        if self.exponential_backoff {
            config.exponential_backoff = true;
        }
    }

    /// Target languages requested on the command line
    pub fn resolve_targets(
        &self,
        source_lang: &str,
        languages: &LanguageRegistry,
    ) -> anyhow::Result<Vec<String>> {
        if self.all {
            return Ok(languages.targets_excluding(source_lang));
        }

        let targets: Vec<String> = self
            .targets
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if targets.is_empty() {
            anyhow::bail!("No target languages given, use --targets or --all");
        }

        Ok(targets)
    }
}

/// Load configuration from a file if given, otherwise from the environment
pub fn load_config(config_path: Option<&PathBuf>) -> anyhow::Result<TranslatorConfig> {
    match config_path {
        Some(path) => TranslatorConfig::from_file(path),
        None => TranslatorConfig::from_env(),
    }
}

/// Handle translation command
pub async fn handle_translate(
    config_path: Option<PathBuf>,
    options: TranslateOptions,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path.as_ref())?;
    options.apply(&mut config);
    config.validate()?;

    let languages = Arc::new(LanguageRegistry::builtin());
    let targets = options.resolve_targets(&config.source_lang, &languages)?;

    info!("Starting batch translation");
    info!("Input: {}", config.source_file.display());
    info!("Output: {}", config.output_dir.display());
    info!("Targets: {}", targets.join(", "));

    let backend = OpenAiBackend::new(config.clone(), languages.clone())?;
    let translator = BatchTranslator::new(
        Arc::new(backend),
        Box::new(JsonFileLoader::new(config.source_file.clone())),
        Box::new(JsonFileWriter::new(
            config.output_dir.clone(),
            config.output_file_name.clone(),
        )),
        languages.clone(),
    )
    .with_retry_policy(config.retry_policy())
    .with_concurrency(config.max_concurrent)
    .with_console_progress(true);

    let summary = translator.run(&config.source_lang, &targets).await?;
    print_summary(&summary, &languages);

    Ok(())
}

/// Print the final report, listing every failed language
pub fn print_summary(summary: &RunSummary, languages: &LanguageRegistry) {
    let report = &summary.report;

    if summary.is_complete() {
        println!("\n✅ Translation completed!");
    } else {
        println!(
            "\n⚠️  Translation completed with {} failures",
            summary.failure_count()
        );
    }
    println!("   Started: {}", summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("   Succeeded: {}", report.succeeded.len());
    println!("   Failed: {}", report.failed.len());
    println!("   Time: {:?}", summary.elapsed);

    if !report.failed.is_empty() {
        println!("\nTranslation failed for the following languages:");
        for (language, error) in &report.failed {
            println!("- {}: {}", languages.label(language), error);
        }
    }
}

/// Handle languages command
pub fn handle_languages() {
    let languages = LanguageRegistry::builtin();
    println!("{} known languages:", languages.len());
    for code in languages.codes() {
        println!("  {:<4} {}", code, languages.display_name(code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_override_config() {
        let mut config = TranslatorConfig::default();
        let options = TranslateOptions {
            output_dir: Some(PathBuf::from("out")),
            source_lang: Some("ko".to_string()),
            max_retries: Some(1),
            max_concurrent: Some(4),
            exponential_backoff: true,
            ..Default::default()
        };

        options.apply(&mut config);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.source_lang, "ko");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.max_concurrent, 4);
        assert!(config.exponential_backoff);
        assert_eq!(config.output_file_name, "common.json");
    }

    #[test]
    fn test_resolve_explicit_targets() {
        let options = TranslateOptions {
            targets: vec!["fr".to_string(), " de ".to_string(), "".to_string()],
            ..Default::default()
        };
        let targets = options
            .resolve_targets("en", &LanguageRegistry::builtin())
            .unwrap();
        assert_eq!(targets, vec!["fr", "de"]);
    }

    #[test]
    fn test_resolve_all_targets() {
        let registry = LanguageRegistry::from_pairs([("en", "English"), ("fr", "French")]);
        let options = TranslateOptions {
            all: true,
            ..Default::default()
        };
        assert_eq!(options.resolve_targets("en", &registry).unwrap(), vec!["fr"]);
    }

    #[test]
    fn test_missing_targets_rejected() {
        let options = TranslateOptions::default();
        assert!(options
            .resolve_targets("en", &LanguageRegistry::builtin())
            .is_err());
    }
}
