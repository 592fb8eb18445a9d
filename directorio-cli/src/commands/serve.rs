//! HTTP server command
//!
//! Connects to PostgreSQL (retrying while it comes up), migrates, and
//! serves the API until Ctrl+C or SIGTERM.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use directorio_server::{run_server, AppState, ServerConfig};

use super::{prepare_database, DbArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// HTTP port
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Keep data in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();

    let state = if args.in_memory {
        tracing::warn!("Using in-memory store, data will not survive a restart");
        AppState::in_memory()
    } else {
        let pool = prepare_database(&args.db).await?;
        AppState::postgres(pool)
    };

    tracing::info!("Starting directorio server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(state, config).await.context("Server error")?;

    Ok(())
}
