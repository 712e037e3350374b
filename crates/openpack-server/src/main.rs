use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use openpack_core::{HttpGateway, MemoryStore, Synthesizer};
use openpack_server::{app, AppState, ServerConfig};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let fetcher = Arc::new(HttpGateway::new(Duration::from_secs(config.timeout_secs))?);
    let store = Arc::new(MemoryStore::new(Duration::from_secs(config.ttl_secs)));
    let synthesizer = Arc::new(Synthesizer::new(store.clone(), config.public_url.clone()));
    let state = AppState {
        fetcher,
        store,
        synthesizer,
    };

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        bind = %config.bind,
        public_url = %config.public_url,
        ttl_secs = config.ttl_secs,
        "openpack registry listening"
    );

    axum::serve(listener, app(state))
        .await
        .context("server terminated")
}
