//! ADK agent gateway.
//!
//! Run with: `adk-gateway [CONFIG]`
//!
//! Serves tools as an MCP server on stdin/stdout, or over HTTP when
//! `http_addr` is configured. Logs go to stderr.

use std::{path::PathBuf, sync::Arc};

use adk_gateway_core::GatewayConfig;
use adk_gateway_transport::{Gateway, http::serve_http, mcp::serve_stdio};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = GatewayConfig::load(config_path.as_deref()).context("Failed to load config")?;
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;

    let gateway = Arc::new(Gateway::new(&config, &cwd));
    tracing::info!(
        registry = %config.registry_path_in(&cwd).display(),
        timeout = ?config.request_timeout(),
        "Gateway ready"
    );

    match config.http_addr.as_deref() {
        Some(addr) => serve_http(gateway, addr)
            .await
            .with_context(|| format!("Failed to serve HTTP on {addr}"))?,
        None => serve_stdio(gateway).await.context("MCP stdio server failed")?,
    }
    Ok(())
}
