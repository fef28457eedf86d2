use anyhow::{Context, Result};
use clap::Parser;
use mock_server::config::Config;
use mock_server::setup::initialize_app;
use mock_server::telemetry::{
    init_telemetry, log_config_validation, log_shutdown_info, log_startup_info,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "todo-mock-server")]
#[command(about = "Stateful mock backend for to-do front-end tests")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream backend for unmatched requests
    #[arg(long, env = "UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => {
            info!("Loading configuration from file: {}", config_file);
            Config::from_file(config_file)?
        }
        None => {
            info!("Loading configuration from environment");
            Config::from_env()?
        }
    };

    // Apply CLI overrides
    if let Some(ref listen_addr) = cli.listen_addr {
        info!("Overriding listen address from CLI");
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(port) = cli.port {
        info!("Overriding port from CLI");
        config.server.port = port;
    }

    if let Some(ref upstream_url) = cli.upstream_url {
        info!("Overriding upstream URL from CLI");
        config.upstream.url = Some(upstream_url.clone());
    }

    if let Some(ref log_level) = cli.log_level {
        info!("Overriding log level from CLI");
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Resolves on SIGTERM or SIGINT (Ctrl-C elsewhere)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, initiating graceful shutdown");
                    }
                    _ = sigint.recv() => {
                        info!("Received SIGINT, initiating graceful shutdown");
                    }
                }
                return;
            }
            _ => warn!("Failed to register signal handlers, falling back to Ctrl-C"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, initiating graceful shutdown"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli).context("Failed to load configuration")?;

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;

    log_config_validation(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        std::process::exit(1);
    }

    log_startup_info(&config);

    info!("Initializing mock server components");
    let server = initialize_app(&config).context("Failed to initialize application")?;

    let addr = config.server_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    match server.serve_with_shutdown(listener, shutdown_signal()).await {
        Ok(()) => {
            log_shutdown_info();
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Mock server error");
            std::process::exit(3);
        }
    }
}
