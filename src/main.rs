use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use weldops::{config, server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::from_env()?;
    weldops::init_tracing(&config.server.log_level);

    let registry = config.registry()?;
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::serve(listener, AppState::new(registry), shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
