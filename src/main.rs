//! Astrologer MCP Server - Entry Point
//!
//! This binary provides an MCP server via STDIO transport for astrological calculations.

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use astrologer::ephemeris::init_ephemeris;
use astrologer::{AstrologerServer, Config};

/// INFO unless `RUST_LOG` says otherwise
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP communication)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    tracing::info!("Starting Astrologer MCP Server");

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(data_dir = %config.data_dir.display(), "Using data directory");

    init_ephemeris();

    let server = AstrologerServer::new(&config).context("Failed to initialize chart storage")?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server initialized, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");

    Ok(())
}
