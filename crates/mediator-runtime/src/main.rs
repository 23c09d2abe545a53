//! # HIE Mediator
//!
//! Entry point: telemetry, configuration, runtime, admin API, Ctrl+C.

use anyhow::{Context, Result};
use mediator_runtime::container::MediatorConfig;
use mediator_runtime::MediatorRuntime;
use mediator_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = MediatorConfig::load().context("Failed to load configuration")?;
    let runtime = MediatorRuntime::new(config)?;
    runtime.start().await?;

    let server = runtime.admin_server()?;
    let serve = tokio::spawn(server.serve(runtime.shutdown_signal()));

    info!("Mediator is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown();
    serve
        .await
        .context("Admin API task aborted")?
        .context("Admin API failed")?;
    info!("Shutdown complete");
    Ok(())
}
