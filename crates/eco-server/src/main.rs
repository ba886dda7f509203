//! Ecosystem simulation server.

mod api;
mod telemetry;

use anyhow::{Context, Result};
use eco_core::{ServerConfig, SimulationConfig};
use eco_world::Ecosystem;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    telemetry::init_telemetry(config.otel_endpoint.as_deref())?;

    let simulation = SimulationConfig::load_dir(&config.config_dir)
        .with_context(|| format!("failed to load configuration from {}", config.config_dir))?;

    info!(
        "Starting ecosystem server on {}:{}",
        config.bind_address, config.port
    );

    let ecosystem = Ecosystem::start(simulation)?;
    let app = api::router(api::AppState {
        world: Arc::clone(ecosystem.world()),
    });

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let killed = ecosystem.shutdown(Duration::from_secs(10)).await;
    info!(killed, "Simulation stopped");

    telemetry::shutdown_telemetry();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
