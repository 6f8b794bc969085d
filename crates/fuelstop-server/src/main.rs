//! Fuel Stop Server - plans the cheapest fuel stops along driving routes

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fuelstop_server::config::Config;
use fuelstop_server::state::AppState;
use fuelstop_server::{api, loops, persistence};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_json)?;

    tracing::info!("Starting Fuel Stop Server...");

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await?;
    let stations = persistence::stations::count_stations(db.pool()).await?;
    if stations == 0 {
        tracing::warn!("Station table is empty; run load_stations to import prices");
    } else {
        tracing::info!("{} stations available", stations);
    }

    let port = config.server_port;
    let prune_interval = std::time::Duration::from_secs(config.cache_prune_interval_s);
    let state = Arc::new(AppState::new(db, config)?);

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let prune_handle = tokio::spawn(loops::cache_prune_loop::run_cache_prune_loop(
        state.clone(),
        prune_interval,
        shutdown_tx.subscribe(),
    ));

    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let signal_tx = shutdown_tx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
            let _ = signal_tx.send(());
        })
        .await?;

    let _ = shutdown_tx.send(());
    let _ = prune_handle.await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("fuelstop_server=debug".parse()?)
        .add_directive("fuelstop_core=info".parse()?);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
    Ok(())
}
