mod bootstrap;
mod health;
mod routes;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use parley_core::config::{AppConfig, ConfigOverrides, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "parley-server",
    about = "Hotel price negotiation agent",
    long_about = "Serve the negotiation endpoints backed by the Gemini generation API.",
    after_help = "Examples:\n  parley-server --port 5000\n  parley-server --config config/parley.toml --log-level debug"
)]
struct Cli {
    #[arg(long, help = "Path to a parley.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Bind address override")]
    bind: Option<String>,
    #[arg(long, help = "Port override")]
    port: Option<u16>,
    #[arg(long, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
}

impl Cli {
    fn load_options(self) -> LoadOptions {
        LoadOptions {
            config_path: self.config,
            require_file: false,
            overrides: ConfigOverrides {
                bind_address: self.bind,
                port: self.port,
                log_level: self.log_level,
                ..ConfigOverrides::default()
            },
        }
    }
}

fn init_logging(config: &AppConfig) {
    use parley_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let cli = Cli::parse();
    let config = AppConfig::load(cli.load_options())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        model = %app.config.llm.model,
        "parley-server started"
    );

    let router = routes::router(app.runtime.clone()).merge(health::router());
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "parley-server stopping"
    );

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
