//! Ordered notification delivery
//!
//! One FIFO queue per channel. Batches for the same channel reach the
//! collaborators in the order they were enqueued; different channels are
//! delivered in parallel. A queue's worker removes its entry and exits once
//! the queue runs dry, so idle channels cost nothing.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::entities::{Channel, ChannelId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::domain::plan::{LifecycleAction, Notification};
use crate::domain::{AdapterError, NotifyError};
use crate::notify::NotifyReport;
use crate::ports::outbound::{PollingScheduler, TcpListenerAdapter};

struct Batch {
    notifications: Vec<Notification>,
    reply: oneshot::Sender<NotifyReport>,
}

/// Per-channel delivery queues sharing one pair of collaborators.
#[derive(Clone)]
pub(crate) struct DeliveryQueues {
    tcp: Arc<dyn TcpListenerAdapter>,
    polling: Arc<dyn PollingScheduler>,
    timeout: Duration,
    queues: Arc<DashMap<ChannelId, mpsc::UnboundedSender<Batch>>>,
}

impl DeliveryQueues {
    pub(crate) fn new(
        tcp: Arc<dyn TcpListenerAdapter>,
        polling: Arc<dyn PollingScheduler>,
        timeout: Duration,
    ) -> Self {
        Self {
            tcp,
            polling,
            timeout,
            queues: Arc::new(DashMap::new()),
        }
    }

    /// Queue a batch behind every earlier batch for `channel_id`. The
    /// receiver yields the batch's report once it has been delivered.
    pub(crate) fn enqueue(
        &self,
        channel_id: ChannelId,
        notifications: Vec<Notification>,
    ) -> oneshot::Receiver<NotifyReport> {
        let (reply, report) = oneshot::channel();
        let batch = Batch {
            notifications,
            reply,
        };

        // The shard lock is held until the batch is queued; the worker takes
        // the same lock before it retires the entry.
        match self.queues.entry(channel_id) {
            Entry::Occupied(mut entry) => {
                if let Err(mpsc::error::SendError(batch)) = entry.get().send(batch) {
                    warn!(channel_id = %channel_id, "Delivery worker lost; starting a new one");
                    entry.insert(self.start_worker(channel_id, batch));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(self.start_worker(channel_id, batch));
            }
        }
        report
    }

    /// Channels with undelivered batches.
    pub(crate) fn len(&self) -> usize {
        self.queues.len()
    }

    fn start_worker(&self, channel_id: ChannelId, first: Batch) -> mpsc::UnboundedSender<Batch> {
        let (sender, receiver) = mpsc::unbounded_channel();
        // Cannot fail: the receiver is alive until the worker exits.
        let _ = sender.send(first);
        tokio::spawn(self.clone().drain(channel_id, receiver));
        sender
    }

    async fn drain(self, channel_id: ChannelId, mut receiver: mpsc::UnboundedReceiver<Batch>) {
        let mut next = receiver.try_recv().ok();
        loop {
            while let Some(batch) = next.take() {
                let report = self.deliver_batch(batch.notifications).await;
                // The caller may have dropped its handle.
                let _ = batch.reply.send(report);
                next = receiver.try_recv().ok();
            }

            let retired = self.queues.remove_if(&channel_id, |_, _| {
                next = receiver.try_recv().ok();
                next.is_none()
            });
            if retired.is_some() {
                debug!(channel_id = %channel_id, "Delivery queue drained");
                return;
            }
        }
    }

    async fn deliver_batch(&self, notifications: Vec<Notification>) -> NotifyReport {
        let mut report = NotifyReport::default();
        for notification in notifications {
            match self.deliver(&notification).await {
                Ok(()) => {
                    debug!(
                        action = %notification.action,
                        channel_id = %notification.channel.id,
                        "Lifecycle notification delivered"
                    );
                    report.delivered.push(notification.action);
                }
                Err(e) => {
                    warn!(
                        action = %e.action,
                        channel_id = %e.channel_id,
                        error = %e.source,
                        "Lifecycle notification failed; configuration stays committed"
                    );
                    report.failures.push(e);
                }
            }
        }
        report
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        let channel: &Channel = &notification.channel;
        let call = async {
            match notification.action {
                LifecycleAction::StartTcpListener => self.tcp.start_listener(channel).await,
                LifecycleAction::StopTcpListener => self.tcp.stop_listener(channel).await,
                LifecycleAction::RegisterPolling => self.polling.register(channel).await,
                LifecycleAction::DeregisterPolling => self.polling.deregister(channel).await,
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::TimedOut(self.timeout)),
        };

        outcome.map_err(|source| NotifyError {
            action: notification.action,
            channel_id: channel.id,
            source,
        })
    }
}
