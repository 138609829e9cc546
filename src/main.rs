use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nl_income_engine::api::{AppState, create_router};
use nl_income_engine::config::ConfigLoader;

/// Disposable income projection service for Dutch salaries.
///
/// Loads a tax-year configuration and serves the projection and
/// eligibility endpoints over HTTP.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Directory holding the tax-year YAML files.
    #[arg(long, default_value = "./config/nl-2025")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

/// Initialise the tracing subscriber, honouring `RUST_LOG` and falling back
/// to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    info!(
        code = %config.metadata().code,
        default_profile = %config.default_profile_name(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    info!(addr = %cli.bind, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
