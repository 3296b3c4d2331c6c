//! Main entry point for Locale Batch Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locale_translator::cli::commands::{self, Commands, TranslateOptions};

/// Locale Batch Translator - translate JSON locale bundles concurrently
#[derive(Parser, Debug)]
#[command(name = "locale-translator", version, about, long_about = None)]
struct Args {
    /// API key (optional, defaults to OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Configuration file (JSON, TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Maximum concurrent translation jobs
    #[arg(long)]
    max_concurrent: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = &args.api_key {
        std::env::set_var("OPENAI_API_KEY", api_key);
    }

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("locale_translator={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Execute command
    match args.command {
        Some(Commands::Translate {
            file,
            output_dir,
            file_name,
            source_lang,
            targets,
            all,
            max_retries,
            retry_delay_ms,
            exponential_backoff,
        }) => {
            let options = TranslateOptions {
                file,
                output_dir,
                file_name,
                source_lang,
                targets,
                all,
                max_concurrent: args.max_concurrent,
                max_retries,
                retry_delay_ms,
                exponential_backoff,
            };
            commands::handle_translate(args.config, options).await?;
        }
        Some(Commands::Languages) => {
            commands::handle_languages();
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
