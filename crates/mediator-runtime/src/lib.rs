//! # HIE Mediator Runtime
//!
//! Wires the mediator subsystems and runs them.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and subsystem construction
//! - `handlers/` - bus event handling
//! - `wiring/` - background tasks
//!
//! ## Startup Sequence
//!
//! 1. Load and validate configuration (defaults, TOML, environment)
//! 2. Wire subsystems
//! 3. Start the bus event handler so lifecycle requests have a receiver
//! 4. Load the registry cache
//! 5. Reconcile protocol resources for every active tcp/polling channel
//! 6. Start the periodic cache refresh
//! 7. Serve the admin API until shutdown

pub mod container;
pub mod handlers;
pub mod wiring;

use anyhow::{Context, Result};
use hm_02_channel_lifecycle::ChannelLifecycleApi;
use hm_04_admin_api::AdminApiServer;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::container::{MediatorConfig, MediatorContainer};
use crate::handlers::BusEventHandler;
use crate::wiring::spawn_cache_refresh;

/// The mediator runtime.
pub struct MediatorRuntime {
    container: Arc<MediatorContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl MediatorRuntime {
    pub fn new(config: MediatorConfig) -> Result<Self> {
        info!("Creating HIE mediator runtime");
        let container =
            Arc::new(MediatorContainer::new(config).context("Failed to wire subsystems")?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Start background work and reconcile protocol resources.
    pub async fn start(&self) -> Result<()> {
        let handler = BusEventHandler::new(self.container.bus.subscribe(BusEventHandler::filter()));
        let mut handler_shutdown = self.shutdown_rx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = handler.run() => {}
                _ = handler_shutdown.changed() => {
                    info!("Bus event handler received shutdown signal");
                }
            }
        });

        let cache = self.container.registry.cache();
        cache
            .refresh()
            .await
            .context("Failed to load registry cache")?;
        info!(channels = cache.snapshot().len(), "Registry cache loaded");

        let batch = self
            .container
            .lifecycle
            .reconcile_all()
            .await
            .context("Failed to reconcile channels")?;
        let report = batch.settled().await;
        if report.all_delivered() {
            info!(delivered = report.delivered.len(), "Protocol resources reconciled");
        } else {
            warn!(
                delivered = report.delivered.len(),
                failed = report.failures.len(),
                "Reconciliation incomplete; collaborators may be out of date"
            );
        }

        spawn_cache_refresh(
            cache,
            self.container.config.registry.refresh_interval(),
            self.shutdown_rx.clone(),
        );

        info!("Mediator runtime started");
        Ok(())
    }

    /// Build the admin server from the wired subsystems.
    pub fn admin_server(&self) -> Result<AdminApiServer> {
        AdminApiServer::new(
            self.container.config.api.clone(),
            self.container.app_state(),
            self.container.identity.clone(),
        )
        .context("Invalid admin API configuration")
    }

    /// Resolves once shutdown has been signalled.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_rx.clone();
        async move {
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }

    /// Signal every task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!(error = %e, "Failed to send shutdown signal");
        }
    }

    pub fn container(&self) -> Arc<MediatorContainer> {
        Arc::clone(&self.container)
    }
}
