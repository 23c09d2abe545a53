//! Candidate matching
//!
//! Reads only the registry snapshot. Protocol decides what "matching"
//! means:
//! - http: enabled `http` channels whose anchored `urlPattern` matches the
//!   whole path
//! - tcp: the enabled `tcp` channel bound to the accepting listener
//! - polling: the enabled `polling` channel the scheduler (or a manual
//!   trigger) fired for
//!
//! Further narrowing (for example by HTTP method) plugs in through
//! `CandidateFilter` without touching ordering or authorization.

use hm_01_channel_registry::RegistrySnapshot;
use shared_types::entities::{Channel, ChannelType};
use shared_types::transaction::{InboundProtocol, TransactionDescriptor};
use std::sync::Arc;

/// Extra predicate applied after protocol and pattern matching.
pub trait CandidateFilter: Send + Sync {
    fn admit(&self, channel: &Channel, tx: &TransactionDescriptor) -> bool;
}

/// Candidate matcher.
#[derive(Clone, Default)]
pub struct Matcher {
    filters: Vec<Arc<dyn CandidateFilter>>,
}

impl Matcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn CandidateFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// All enabled channels that claim `tx`.
    #[must_use]
    pub fn candidates<'a>(
        &self,
        snapshot: &'a RegistrySnapshot,
        tx: &TransactionDescriptor,
    ) -> Vec<&'a Channel> {
        let protocol_matches: Vec<&Channel> = match tx.protocol {
            InboundProtocol::Http => snapshot
                .channels()
                .iter()
                .filter(|c| c.channel.channel_type == ChannelType::Http)
                .filter(|c| c.matches_path(&tx.path))
                .map(|c| &c.channel)
                .collect(),
            InboundProtocol::Tcp { channel_id } => snapshot
                .get(channel_id)
                .map(|c| &c.channel)
                .filter(|c| c.channel_type == ChannelType::Tcp)
                .into_iter()
                .collect(),
            InboundProtocol::Polling { channel_id } => snapshot
                .get(channel_id)
                .map(|c| &c.channel)
                .filter(|c| c.channel_type == ChannelType::Polling)
                .into_iter()
                .collect(),
        };

        protocol_matches
            .into_iter()
            .filter(|c| c.is_enabled())
            .filter(|c| self.filters.iter().all(|f| f.admit(c, tx)))
            .collect()
    }
}
