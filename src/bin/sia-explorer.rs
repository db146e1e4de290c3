#![forbid(unsafe_code)]
//! Explorer server: JSON API over a local daemon plus the static client.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sia_explorer::api::run_api_server;
use sia_explorer::config::load_config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Daemon API port on localhost
    #[arg(short = 'a', long)]
    api_port: Option<u16>,
    /// HTTP port to serve on
    #[arg(short, long)]
    port: Option<u16>,
    /// Full daemon base URL; takes precedence over --api-port
    #[arg(short, long)]
    daemon_url: Option<String>,
    /// Config file (defaults to ./explorer.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    if let Some(port) = cli.api_port {
        config.daemon = config.daemon.with_local_port(port);
    }
    if let Some(url) = cli.daemon_url {
        config.daemon.url = url;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    run_api_server(config).await
}
