use clap::{Parser, Subcommand};
use std::sync::Arc;

use line_food_bot::application::errors::BotError;
use line_food_bot::application::services::{CommandResolver, WebhookHandler};
use line_food_bot::infrastructure::adapters::line::{LineAdapter, LineEventParser, LineSignatureVerifier};
use line_food_bot::infrastructure::config::{Config, LineCredentials};
use line_food_bot::infrastructure::http::{self, AppState};

#[derive(Parser)]
#[command(name = "line-food-bot")]
#[command(about = "LINE webhook bot that answers food recommendation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Secrets may come from a local .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("line-food-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    // Fail fast before anything else is set up
    let credentials = LineCredentials::from_env().map_err(|e| BotError::Config(e.to_string()))?;

    let config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path).map_err(|e| BotError::Config(e.to_string()))?
    } else {
        tracing::info!("{} not found, using defaults", config_path);
        Config::default()
    }
    .with_env_overrides();
    config.validate().map_err(|e| BotError::Config(e.to_string()))?;

    let table = config
        .recommendation_table()
        .map_err(|e| BotError::Config(e.to_string()))?;
    tracing::info!("Loaded {} command(s)", table.len());

    let sender = LineAdapter::new(credentials.channel_access_token, config.reply_timeout())?
        .with_api_base(config.line.api_base.clone());

    let handler = WebhookHandler::new(
        Arc::new(LineSignatureVerifier::new(credentials.channel_secret)),
        Arc::new(LineEventParser),
        Arc::new(sender),
        CommandResolver::new(Arc::new(table)),
    )
    .with_reply_timeout(config.reply_timeout());

    let app = http::router(AppState::new(handler), config.request_timeout());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(http::serve(&config.server.bind, app))
        .map_err(|e| BotError::Network(e.to_string()))
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
            println!("Secrets are read from LINE_CHANNEL_ACCESS_TOKEN and LINE_CHANNEL_SECRET.");
        }
        Err(e) => tracing::error!("Failed to render config: {}", e),
    }
}
