//! favcache server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use favcache_client::{FetchClient, FetchConfig, Fetcher, IconService, Lifecycle};
use favcache_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), namespace = %config.cache_namespace, "loaded configuration");

    let db = CacheDb::open(&config.db_path).await?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(FetchClient::new(FetchConfig::from(&config))?);
    let icons = IconService::new(&db, &config, fetcher.clone());

    icons.on_lifecycle(Lifecycle::Install).await;
    icons.on_lifecycle(Lifecycle::Activate).await;

    tracing::info!("Starting favcache server on stdio transport");

    let handler = handler::FavcacheServer::new(icons, db.clone(), fetcher);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;
    db.close().await?;

    Ok(())
}
