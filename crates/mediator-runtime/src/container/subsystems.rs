//! Subsystem construction and dependency injection.
//!
//! Build order follows the dependency graph:
//! 1. Event bus and stores
//! 2. Channel registry (owns the cache)
//! 3. Lifecycle manager, routing engine (both on top of the registry)
//! 4. Admin identity resolver

use hm_01_channel_registry::adapters::{
    InMemoryChannelStore, InMemoryPatchStore, InMemoryTransactionCounter,
};
use hm_01_channel_registry::ChannelRegistryService;
use hm_02_channel_lifecycle::{
    BusPollingScheduler, BusTcpAdapter, ChannelLifecycleService, LifecycleError,
};
use hm_03_channel_routing::ChannelRoutingService;
use hm_04_admin_api::{AppState, StaticTokenResolver};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::{info, warn};

use super::config::MediatorConfig;

/// All wired subsystems.
pub struct MediatorContainer {
    pub config: MediatorConfig,
    pub bus: Arc<InMemoryEventBus>,
    pub channels: Arc<InMemoryChannelStore>,
    pub transactions: Arc<InMemoryTransactionCounter>,
    pub registry: Arc<ChannelRegistryService>,
    pub lifecycle: Arc<ChannelLifecycleService>,
    pub routing: Arc<ChannelRoutingService>,
    pub identity: Arc<StaticTokenResolver>,
}

impl MediatorContainer {
    pub fn new(config: MediatorConfig) -> Result<Self, LifecycleError> {
        let bus = Arc::new(InMemoryEventBus::new());
        let channels = Arc::new(InMemoryChannelStore::new());
        let transactions = Arc::new(InMemoryTransactionCounter::new());

        let registry = Arc::new(ChannelRegistryService::new(
            channels.clone(),
            Arc::new(InMemoryPatchStore::new()),
            transactions.clone(),
            &config.registry,
        ));

        let lifecycle = Arc::new(ChannelLifecycleService::new(
            registry.clone(),
            Arc::new(BusTcpAdapter::new(bus.clone())),
            Arc::new(BusPollingScheduler::new(bus.clone())),
            config.lifecycle.clone(),
        )?);

        let routing = Arc::new(ChannelRoutingService::new(
            registry.cache(),
            registry.clone(),
            bus.clone(),
        ));

        if config.auth.users.is_empty() {
            warn!("No admin users configured; every admin request will be rejected");
        }
        let identity = Arc::new(StaticTokenResolver::new(&config.auth));

        info!(
            cache_ttl_secs = config.registry.cache_ttl_secs,
            admin_users = config.auth.users.len(),
            "Subsystems wired"
        );

        Ok(Self {
            config,
            bus,
            channels,
            transactions,
            registry,
            lifecycle,
            routing,
            identity,
        })
    }

    /// Handler state for the admin surface.
    pub fn app_state(&self) -> AppState {
        AppState {
            registry: self.registry.clone(),
            lifecycle: self.lifecycle.clone(),
            routing: self.routing.clone(),
        }
    }
}
