use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use firebreak::config;
use firebreak::output;
use firebreak::screen::{FilterClient, FilterMode, FilterResult};

/// Firebreak: screen AI/LLM output through an external content filter.
///
/// Wraps a local filter executable and normalizes its verdicts, so chat
/// pipelines and batch jobs get one stable result shape whether content
/// was safe, blocked, or the filter itself failed.
#[derive(Parser)]
#[command(name = "firebreak", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one text and show the verdict
    Check {
        /// Text to check
        text: String,

        /// Overlay config file passed through to the filter
        #[arg(long)]
        config: Option<PathBuf>,

        /// Filter mode (strict, moderate, loose)
        #[arg(long)]
        mode: Option<String>,

        /// Print the raw verdict as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Check one text and print the displayable version
    Filter {
        /// Text to filter
        text: String,

        /// Replacement for blocked content without a filtered rendition
        #[arg(long)]
        replacement: Option<String>,
    },

    /// Screen many texts concurrently, one per line
    Batch {
        /// File of texts, one per line (stdin when omitted)
        file: Option<PathBuf>,

        /// Number of checks to run in parallel
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Print results as a JSON array instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Run a scripted chat-moderation walkthrough
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("firebreak=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            text,
            config,
            mode,
            json,
        } => {
            let client = build_client(config, mode, None)?;
            let result = client.check_async(&text).await;

            if json {
                println!("{}", result_json(&result)?);
            } else {
                output::display_result(&text, &result);
            }
        }

        Commands::Filter { text, replacement } => {
            let client = build_client(None, None, replacement)?;
            println!("{}", client.filter_text_async(&text).await);
        }

        Commands::Batch {
            file,
            concurrency,
            json,
        } => {
            let texts = read_batch_input(file)?;
            if texts.is_empty() {
                println!("No input texts.");
                return Ok(());
            }

            let client = build_client(None, None, None)?;
            info!(count = texts.len(), concurrency, "screening batch");

            let pb = ProgressBar::new(texts.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Screening [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap(),
            );
            pb.enable_steady_tick(Duration::from_millis(100));

            let results = client.check_batch(&texts, concurrency).await;
            pb.set_position(results.len() as u64);
            pb.finish_and_clear();

            if json {
                let values: Vec<_> = results
                    .iter()
                    .map(|r| result_json(r))
                    .collect::<Result<_>>()?;
                println!("[{}]", values.join(","));
            } else {
                output::display_batch(&texts, &results);
            }
        }

        Commands::Chat => {
            let client = build_client(None, None, None)?;
            run_chat_demo(&client).await;
        }
    }

    Ok(())
}

/// Build a FilterClient from env configuration, with optional CLI overrides.
fn build_client(
    config_override: Option<PathBuf>,
    mode_override: Option<String>,
    replacement_override: Option<String>,
) -> Result<FilterClient> {
    let mut cfg = config::Config::load()?;

    if let Some(path) = config_override {
        cfg.config_path = Some(path);
    }
    if let Some(raw) = mode_override {
        cfg.mode = Some(raw.parse::<FilterMode>()?);
    }
    if let Some(replacement) = replacement_override {
        cfg.replacement = replacement;
    }

    let defaults = cfg.invocation_defaults();
    Ok(FilterClient::new(&cfg.filter_path, defaults)?
        .with_timeout(cfg.timeout)
        .with_replacement(cfg.replacement))
}

/// Render a result the way the filter itself would: the verdict object for
/// evaluated content, an error object when the tool failed.
fn result_json(result: &FilterResult) -> Result<String> {
    let value = match result {
        FilterResult::Evaluated(v) => serde_json::to_value(v)?,
        FilterResult::ToolFailure { message } => serde_json::json!({ "error": message }),
    };
    serde_json::to_string(&value).context("failed to serialize result")
}

/// Read batch input from a file or stdin, skipping blank lines.
fn read_batch_input(file: Option<PathBuf>) -> Result<Vec<String>> {
    let lines: Vec<String> = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("failed to read stdin")?,
    };

    Ok(lines
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .collect())
}

/// A canned user/assistant exchange where every assistant turn is screened
/// before display.
async fn run_chat_demo(client: &FilterClient) {
    println!("{}", "Chat moderation walkthrough".bold());
    println!("{}", "-".repeat(40).dimmed());

    let exchange = [
        ("user", "How do I create a REST API?"),
        (
            "assistant",
            "To create a REST API, you can use a framework like Axum or Actix...",
        ),
        ("user", "Can you help me hack into a system?"),
        (
            "assistant",
            "I can help you understand system security for defensive purposes...",
        ),
        ("user", "Tell me about machine learning"),
        (
            "assistant",
            "Machine learning is a subset of AI that enables systems to learn from data...",
        ),
    ];

    for (role, text) in exchange {
        if role == "user" {
            println!("\n{} {}", "User:".bold(), text);
        } else {
            let displayed = client.filter_text_async(text).await;
            println!("{} {}", "Assistant:".cyan().bold(), displayed);
        }
    }
}
