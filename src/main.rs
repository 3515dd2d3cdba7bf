//! Gym Concierge - Main Entry Point

use gym_concierge::agent::{TurnDriver, TurnSettings};
use gym_concierge::config::ConciergeConfig;
use gym_concierge::llm::provider::LlmProvider;
use gym_concierge::llm::providers::{OpenAiConfig, OpenAiProvider};
use gym_concierge::observability::init_default_logging;
use gym_concierge::transport::ChannelServer;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// Default config file locations, tried in order when `-c` is not given
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["concierge.toml", "config/concierge.toml"];

/// WebSocket front desk for a gym: coordinator plus exercise, diet and myth specialists
#[derive(Parser)]
#[command(name = "gym-concierge")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (overrides LOG_LEVEL)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat channel server
    Run {
        /// Listen port (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate configuration
    Config {
        /// Show resolved configuration
        #[arg(long)]
        show: bool,
    },
    /// Verify the model credential against the provider
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.verbose {
        0 => {}
        1 => std::env::set_var("LOG_LEVEL", "DEBUG"),
        _ => std::env::set_var("LOG_LEVEL", "TRACE"),
    }
    init_default_logging();

    info!("Starting gym-concierge v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run { port } => run_server(config, port).await,
        Commands::Config { show } => handle_config_command(&config, show),
        Commands::Check => check_provider(&config).await,
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    config_path: Option<&PathBuf>,
) -> Result<ConciergeConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return Ok(ConciergeConfig::load_from_file(path)?);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return Ok(ConciergeConfig::load_from_file(&path)?);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(ConciergeConfig::from_env()?)
}

/// Provider factory for creating LLM providers from configuration
struct LlmProviderFactory;

impl LlmProviderFactory {
    fn create_provider(
        config: &ConciergeConfig,
    ) -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>> {
        match config.llm.provider.as_str() {
            "openai" => {
                let openai_config = OpenAiConfig {
                    api_key: config.get_llm_api_key()?,
                    base_url: config.llm.base_url.clone(),
                    timeout: Duration::from_secs(config.llm.timeout_secs),
                };
                Ok(Arc::new(OpenAiProvider::new(openai_config)?))
            }
            provider => Err(format!("Unsupported LLM provider: {provider}").into()),
        }
    }
}

async fn run_server(
    mut config: ConciergeConfig,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.server.port = port;
        config.validate()?;
    }

    let addr: SocketAddr = config.listen_addr().parse()?;

    // Bootstrap: the provider is the only injected dependency
    let provider = LlmProviderFactory::create_provider(&config)?;
    info!(provider = provider.name(), model = %config.llm.model, "LLM provider ready");

    let driver = Arc::new(TurnDriver::new(
        provider,
        TurnSettings::from_config(&config),
    ));

    ChannelServer::new(driver)
        .serve(addr, shutdown_signal())
        .await?;

    Ok(())
}

fn handle_config_command(
    config: &ConciergeConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}

async fn check_provider(config: &ConciergeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = LlmProviderFactory::create_provider(config)?;
    provider.health_check().await?;
    info!(provider = provider.name(), "Provider health check passed");
    Ok(())
}

/// Resolve on SIGINT or, on unix, SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT, shutting down gracefully..."),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully..."),
    }
}
