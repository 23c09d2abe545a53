//! Event-bus backed collaborators
//!
//! Translate adapter and scheduler calls into `MediatorEvent`s. A publish
//! no subscription on the event's topic accepts counts as an unavailable
//! collaborator.

use async_trait::async_trait;
use shared_bus::{EventPublisher, MediatorEvent};
use shared_types::entities::Channel;
use std::sync::Arc;

use crate::domain::AdapterError;
use crate::ports::outbound::{PollingScheduler, TcpListenerAdapter};

async fn publish(
    bus: &dyn EventPublisher,
    event: MediatorEvent,
    who: &str,
) -> Result<(), AdapterError> {
    match bus.publish(event).await {
        0 => Err(AdapterError::Unavailable(format!("no {who} subscribed"))),
        _ => Ok(()),
    }
}

/// Publishes listener start/stop requests.
pub struct BusTcpAdapter {
    bus: Arc<dyn EventPublisher>,
}

impl BusTcpAdapter {
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl TcpListenerAdapter for BusTcpAdapter {
    async fn start_listener(&self, channel: &Channel) -> Result<(), AdapterError> {
        let event = MediatorEvent::StartTcpListener(Box::new(channel.clone()));
        publish(self.bus.as_ref(), event, "tcp adapter").await
    }

    async fn stop_listener(&self, channel: &Channel) -> Result<(), AdapterError> {
        let event = MediatorEvent::StopTcpListener(Box::new(channel.clone()));
        publish(self.bus.as_ref(), event, "tcp adapter").await
    }
}

/// Publishes schedule register/deregister requests.
pub struct BusPollingScheduler {
    bus: Arc<dyn EventPublisher>,
}

impl BusPollingScheduler {
    pub fn new(bus: Arc<dyn EventPublisher>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl PollingScheduler for BusPollingScheduler {
    async fn register(&self, channel: &Channel) -> Result<(), AdapterError> {
        let event = MediatorEvent::RegisterPolling(Box::new(channel.clone()));
        publish(self.bus.as_ref(), event, "polling scheduler").await
    }

    async fn deregister(&self, channel: &Channel) -> Result<(), AdapterError> {
        let event = MediatorEvent::DeregisterPolling(Box::new(channel.clone()));
        publish(self.bus.as_ref(), event, "polling scheduler").await
    }
}
