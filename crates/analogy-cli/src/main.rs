mod logging;
mod render;
mod session;

use analogy_client::HttpAnalogyClient;
use analogy_core::{AnalogyConfig, AnalogyFormController, AnalogyService, ConfigManager};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "analogy")]
#[command(about = "Analogy form - generate analogies for a concept and rate them", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Base URL of the analogy service
    #[arg(long, global = true, env = "ANALOGY_SERVICE_URL")]
    url: Option<String>,

    /// Config file (defaults to ./.analogy.toml, then ~/.analogy/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an analogy for a concept
    Generate {
        /// Concept you want to understand
        question: String,
    },

    /// Interactive form: ask, rate and submit feedback
    Form,

    /// Check whether the analogy service is reachable
    Status,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Target path (defaults to ~/.analogy/config.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Serialize)]
struct StatusResult {
    endpoint: String,
    available: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = tracing::subscriber::with_default(
        logging::bootstrap_subscriber(cli.verbose),
        || match &cli.config {
            Some(path) => ConfigManager::from_file(path),
            None => ConfigManager::load(),
        },
    )
    .context("Failed to load configuration")?;

    let mut config = manager.config().clone();
    if let Some(url) = &cli.url {
        config.service.base_url = url.clone();
        ConfigManager::validate_config(&config).context("Invalid --url")?;
    }

    logging::init_tracing(&config.logging, cli.verbose);
    tracing::debug!("Using analogy service at {}", config.service.base_url);

    if let Err(e) = execute_command(&cli, config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn execute_command(cli: &Cli, config: AnalogyConfig) -> Result<()> {
    match &cli.command {
        Commands::Generate { question } => {
            let client = build_client(&config)?;
            let form = AnalogyFormController::new(client);
            let result = form
                .generate(question)
                .await
                .context("Failed to generate analogy")?;

            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Pretty => print!("{}", render::render_result(&result)),
            }
            Ok(())
        }

        Commands::Form => {
            let client = build_client(&config)?;
            let form = AnalogyFormController::new(client);
            session::run(&form).await
        }

        Commands::Status => {
            let client = build_client(&config)?;
            let status = StatusResult {
                endpoint: client.endpoint().to_string(),
                available: client.is_available().await,
            };

            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
                OutputFormat::Pretty => {
                    let state = if status.available {
                        "reachable".green()
                    } else {
                        "unreachable".red()
                    };
                    println!("{}: {}", status.endpoint.cyan().bold(), state);
                }
            }
            Ok(())
        }

        Commands::Config(ConfigCommands::Init { path }) => {
            let path = match path {
                Some(path) => path.clone(),
                None => ConfigManager::user_config_path()
                    .context("Could not determine home directory")?,
            };
            ConfigManager::create_default_config(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
            Ok(())
        }

        Commands::Config(ConfigCommands::Show) => {
            match cli.output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Pretty => print!("{}", toml::to_string_pretty(&config)?),
            }
            Ok(())
        }
    }
}

fn build_client(config: &AnalogyConfig) -> Result<Arc<HttpAnalogyClient>> {
    let client = HttpAnalogyClient::new(config.service.clone())
        .context("Failed to create analogy service client")?;
    Ok(Arc::new(client))
}
