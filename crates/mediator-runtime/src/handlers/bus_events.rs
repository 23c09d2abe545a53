//! # Bus Event Handler
//!
//! In-process endpoint for the events nobody else consumes: manual
//! triggers, completed-transaction records and critical alarms. Each event
//! becomes one structured log line.
//!
//! Listener and schedule requests stay off this subscription. They belong to
//! the TCP adapter and polling scheduler, and a missing collaborator must
//! show up as a failed notification rather than be absorbed here.

use shared_bus::{EventFilter, EventTopic, MediatorEvent, Subscription};
use tracing::{debug, error, info};

pub struct BusEventHandler {
    subscription: Subscription,
}

impl BusEventHandler {
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Topics this handler owns.
    #[must_use]
    pub fn filter() -> EventFilter {
        EventFilter::topics(vec![
            EventTopic::Dispatch,
            EventTopic::CompletedTransactions,
            EventTopic::Critical,
        ])
    }

    /// Handle events until the bus closes. Returns how many were handled.
    pub async fn run(mut self) -> usize {
        info!("Bus event handler started");
        let mut handled = 0;
        while let Some(event) = self.subscription.recv().await {
            handle(&event);
            handled += 1;
        }
        info!(handled, "Bus event handler stopped");
        handled
    }
}

fn handle(event: &MediatorEvent) {
    match event {
        MediatorEvent::ChannelTriggered {
            channel_id,
            channel_name,
            route,
        } => info!(
            channel_id = %channel_id,
            name = %channel_name,
            route = %route,
            "Channel triggered"
        ),
        MediatorEvent::TransactionCompleted(record) => debug!(
            channel_id = %record.channel_id,
            status = ?record.status,
            response_time_ms = record.response_time_ms(),
            "Transaction completed"
        ),
        MediatorEvent::CriticalError {
            subsystem_id,
            error: reason,
        } => error!(subsystem_id, reason = %reason, "Critical error reported"),
        other => debug!(topic = ?other.topic(), "Ignoring protocol event"),
    }
}
