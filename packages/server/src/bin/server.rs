use anyhow::Context;
use clap::Parser;
use jsxed_server::{app, ServerConfig};
use jsxed_store::{ComponentStore, FileStore, MemoryStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();

    let store: Arc<dyn ComponentStore> = if config.memory {
        tracing::info!("Using in-memory component store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Using component store at {}", config.store.display());
        Arc::new(FileStore::new(config.store.clone()))
    };

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("Listening on http://{}", config.addr);

    axum::serve(listener, app(store)).await?;
    Ok(())
}
