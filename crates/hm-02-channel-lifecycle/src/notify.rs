//! Fire-and-forget notification batches
//!
//! Each committed mutation queues its plan behind earlier plans for the same
//! channel. Callers that do not care drop the handle; delivery continues.

use tokio::sync::oneshot;
use tracing::error;

use crate::domain::{LifecycleAction, NotifyError};

/// What happened to one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotifyReport {
    pub delivered: Vec<LifecycleAction>,
    pub failures: Vec<NotifyError>,
}

impl NotifyReport {
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Handle on queued notification batches, one per affected channel.
#[derive(Debug)]
pub struct NotifyHandle {
    planned: Vec<LifecycleAction>,
    pending: Vec<oneshot::Receiver<NotifyReport>>,
}

impl NotifyHandle {
    pub(crate) fn queued(
        planned: Vec<LifecycleAction>,
        pending: Vec<oneshot::Receiver<NotifyReport>>,
    ) -> Self {
        Self { planned, pending }
    }

    /// A batch with nothing to deliver.
    #[must_use]
    pub fn none() -> Self {
        Self {
            planned: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Actions in delivery order.
    #[must_use]
    pub fn planned(&self) -> &[LifecycleAction] {
        &self.planned
    }

    /// Wait for every batch to finish.
    pub async fn settled(self) -> NotifyReport {
        let mut merged = NotifyReport::default();
        for pending in self.pending {
            match pending.await {
                Ok(report) => {
                    merged.delivered.extend(report.delivered);
                    merged.failures.extend(report.failures);
                }
                Err(e) => error!(error = %e, "Notification batch dropped before delivery"),
            }
        }
        merged
    }
}

/// Result of a committed mutation plus its pending notifications.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub notifications: NotifyHandle,
}
