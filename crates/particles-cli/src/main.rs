//! PARTicles CLI - compress articles to your preferred reading length

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use particles_core::compression::{
    CompressionLevel, CompressionOutcome, CompressionPlan, CompressionRequest, Compressor,
};
use particles_core::config::Config;
use particles_core::llm::LlmClient;
use particles_core::Error;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "particles")]
#[command(author, version, about = "PARTicles - Article Compression Tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress an article
    Compress {
        /// Article file (reads stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Compression level in % reduction: 10 keeps 90% of the content, 90 keeps 10%
        #[arg(short, long, value_parser = parse_level)]
        level: Option<CompressionLevel>,
        /// Show the target length and prompt without calling the model
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn parse_level(s: &str) -> Result<CompressionLevel, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

/// Default log filter for our crates; quiet mode only lets warnings through
fn log_directive(quiet: bool) -> &'static str {
    if quiet { "particles=warn" } else { "particles=info" }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_directive(cli.quiet).parse()?),
        )
        .init();

    match cli.command {
        Commands::Compress {
            file,
            level,
            dry_run,
        } => cmd_compress(file.as_deref(), level, dry_run, cli.format, cli.quiet).await,

        Commands::Config { action } => cmd_config(action, cli.quiet),

        Commands::Doctor => cmd_doctor(cli.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_compress(
    file: Option<&Path>,
    level: Option<CompressionLevel>,
    dry_run: bool,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let level = level.unwrap_or_else(|| config.default_level());
    let article = read_article(file)?;

    let plan = CompressionRequest::new(article, level)?
        .plan_within(config.compression.max_input_words)?;

    if dry_run {
        return print_plan(&plan, format, quiet);
    }

    let api_key = config.llm.resolved_api_key()?.ok_or_else(|| {
        Error::ConfigError(
            "API key not set. Set PARTICLES_API_KEY or OPENAI_API_KEY environment variable."
                .to_string(),
        )
    })?;
    let client = LlmClient::new(config.llm.clone(), api_key)?;
    let compressor = Compressor::from_config(client, &config);

    if !quiet && format == OutputFormat::Text {
        eprintln!("Compressing article to {}% of original...", level.kept_pct());
    }

    let outcome = match compressor.run(&plan).await {
        Ok(outcome) => outcome,
        Err(e @ Error::Completion(_)) => {
            warn!(code = e.code(), "Compression failed");
            return Err(anyhow::anyhow!("Compression failed: {}", e));
        }
        Err(e) => return Err(e.into()),
    };

    print_outcome(&outcome, format, quiet)
}

/// Read the article from `file`, or stdin when absent or "-"
fn read_article(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "Reading article from file");
            std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
        }
        _ => {
            debug!("Reading article from stdin");
            let mut article = String::new();
            std::io::stdin()
                .read_to_string(&mut article)
                .map_err(Error::Io)?;
            Ok(article)
        }
    }
}

fn print_plan(plan: &CompressionPlan, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(plan)?);
        }
        OutputFormat::Text => {
            println!(
                "Will reduce article to approximately {}% of original length",
                plan.level.kept_pct()
            );
            println!("  Original Length: {} words", plan.target.original_word_count);
            println!("  Target Length: {} words", plan.target.target_word_count);
            println!("  Token Budget: {}", plan.target.token_budget);
            if !quiet {
                println!("\n--- System Prompt ---\n{}", plan.prompt.system);
                println!("\n--- User Prompt ---\n{}", plan.prompt.user);
            }
        }
    }
    Ok(())
}

fn print_outcome(
    outcome: &CompressionOutcome,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Text if quiet => {
            println!("{}", outcome.result.compressed_text);
        }
        OutputFormat::Text => {
            println!("Article compressed successfully!");
            println!();
            println!("  Original Length: {} words", outcome.original_word_count);
            println!(
                "  Compressed Length: {} words",
                outcome.result.compressed_word_count
            );
            println!("  Actual Reduction: {}%", outcome.result.actual_reduction_pct);
            println!();
            println!("### Compressed Article");
            println!();
            println!("{}", outcome.result.compressed_text);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("PARTicles Health Check");
        println!("======================");
        println!();
    }

    let mut all_ok = true;

    match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
                println!("[OK] Model: {}", config.llm.model);
                println!("[OK] Endpoint: {}", config.llm.base_url);
            }

            match config.llm.resolved_api_key() {
                Ok(Some(key)) => {
                    if !quiet {
                        println!("[OK] API Key: Configured ({})", key.redacted());
                    }
                }
                Ok(None) => {
                    all_ok = false;
                    if !quiet {
                        warn!("API Key: Not configured");
                        println!("[!!] API Key: Not configured");
                        println!(
                            "     Set PARTICLES_API_KEY or OPENAI_API_KEY environment variable"
                        );
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] API Key: Error - {}", e);
                    }
                }
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
        }
    }

    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => println!("[!!] Config file: {}", e),
        }
        println!();
    }

    if all_ok {
        if !quiet {
            println!("All checks passed.");
        }
        Ok(())
    } else {
        Err(anyhow::anyhow!("Health check found problems"))
    }
}
