use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use backend::api::{self, AppState};
use backend::config::ServerConfig;
use backend::game::GameServer;
use backend::ledger::{spawn_ledger_task, MemoryLedger, PointsLedger, SqliteLedger};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LEDGER_DRAIN: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    let ledger: Arc<dyn PointsLedger> = match &config.database_url {
        Some(url) => {
            info!("[LEDGER] Using database {}", url);
            Arc::new(
                SqliteLedger::connect(url)
                    .await
                    .context("Failed to connect to database")?,
            )
        }
        None => {
            warn!("[LEDGER] DATABASE_URL not set, points are kept in memory");
            Arc::new(MemoryLedger::new())
        }
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let ledger_task = spawn_ledger_task(ledger.clone(), events_rx);
    let server = GameServer::spawn(config.game.clone(), events_tx);

    let app = api::router(AppState { server, ledger });
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Open websockets may still hold the game server; give the ledger a bounded drain
    match tokio::time::timeout(LEDGER_DRAIN, ledger_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("[LEDGER] Ledger task failed: {}", e),
        Err(_) => warn!(
            "[LEDGER] Ledger still busy after {}, exiting",
            humantime::format_duration(LEDGER_DRAIN)
        ),
    }
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
