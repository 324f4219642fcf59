use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use shellhacked::server::{self, BeaconStore};

#[tokio::main]
async fn main() -> Result<()> {
    server::init_tracing();

    let database_url =
        std::env::var("BEACON_DB").unwrap_or_else(|_| server::DEFAULT_DATABASE_URL.to_string());
    let store = BeaconStore::connect(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;
    store.migrate().await.context("failed to create tables")?;

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(server::DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = TcpListener::bind(addr).await?;
    info!(target: "beacon_server", %addr, %database_url, "HTTP server listening");
    axum::serve(listener, server::build_router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(target: "beacon_server", "shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
    }
}
