//! Key-rotating reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                    KEYPOOL PROXY                      │
//!                     │                                                      │
//!  Client Request     │  ┌──────────┐   ┌───────────┐   ┌──────────────┐     │
//!  ───────────────────┼─▶│ preflight│──▶│  header   │──▶│ key selector │     │
//!                     │  │ (OPTIONS)│   │ sanitizer │   │ (random key) │     │
//!                     │  └──────────┘   └───────────┘   └──────┬───────┘     │
//!                     │                                        ▼             │
//!  Client Response    │  ┌──────────┐                   ┌──────────────┐     │
//!  ◀──────────────────┼──│ response │◀──────────────────│  forwarder   │◀────┼── Upstream
//!                     │  │ rewriter │                   │ (streaming)  │     │   (HTTPS)
//!                     │  └──────────┘                   └──────────────┘     │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use keypool_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use keypool_proxy::lifecycle;
use keypool_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "keypool-proxy")]
#[command(about = "Reverse proxy that rotates among a pool of API keys per request", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override upstream.host.
    #[arg(long)]
    upstream_host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(host) = cli.upstream_host {
        config.upstream.host = host;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.host,
        "keypool-proxy starting"
    );

    lifecycle::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
