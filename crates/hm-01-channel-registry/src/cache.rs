//! # Registry Cache
//!
//! Immutable snapshots of the enabled channels, swapped atomically with
//! `arc-swap`. Readers take an `Arc` to the current snapshot and keep
//! matching against it even while a refresh builds the next one, so a
//! mutation becomes visible all at once or not at all.

use arc_swap::ArcSwap;
use regex::Regex;
use shared_types::entities::{Channel, ChannelId};
use shared_types::errors::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::validation::anchored;
use crate::ports::outbound::ChannelStore;

/// An enabled channel with its compiled, anchored URL pattern.
#[derive(Debug, Clone)]
pub struct CachedChannel {
    pub channel: Channel,
    pattern: Regex,
}

impl CachedChannel {
    /// Compile `channel.url_pattern`. Fails only for patterns that bypassed
    /// validation.
    pub fn compile(channel: Channel) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&anchored(&channel.url_pattern))?;
        Ok(Self { channel, pattern })
    }

    /// Whole-path match.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// One point-in-time view of the enabled channels.
#[derive(Debug)]
pub struct RegistrySnapshot {
    channels: Vec<CachedChannel>,
    loaded_at: Instant,
    generation: u64,
}

impl RegistrySnapshot {
    /// Build a snapshot from stored channels. Non-enabled channels are
    /// dropped; uncompilable patterns are logged and skipped.
    #[must_use]
    pub fn from_channels(channels: Vec<Channel>, generation: u64) -> Self {
        let channels = channels
            .into_iter()
            .filter(Channel::is_enabled)
            .filter_map(|channel| {
                let id = channel.id;
                CachedChannel::compile(channel)
                    .map_err(|e| warn!(channel_id = %id, error = %e, "Skipping channel with bad urlPattern"))
                    .ok()
            })
            .collect();

        Self {
            channels,
            loaded_at: Instant::now(),
            generation,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::from_channels(Vec::new(), 0)
    }

    #[must_use]
    pub fn channels(&self) -> &[CachedChannel] {
        &self.channels
    }

    #[must_use]
    pub fn get(&self, id: ChannelId) -> Option<&CachedChannel> {
        self.channels.iter().find(|c| c.channel.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn loaded_at(&self) -> Instant {
        self.loaded_at
    }

    /// Increases by one on every successful refresh.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Store-backed holder of the current snapshot.
pub struct RegistryCache {
    store: Arc<dyn ChannelStore>,
    current: ArcSwap<RegistrySnapshot>,
    ttl: Duration,
    invalidated: AtomicBool,
    refresh_lock: Mutex<()>,
}

impl RegistryCache {
    /// A cache that starts empty and invalidated; call `refresh` before
    /// serving traffic.
    pub fn new(store: Arc<dyn ChannelStore>, ttl: Duration) -> Self {
        Self {
            store,
            current: ArcSwap::from_pointee(RegistrySnapshot::empty()),
            ttl,
            invalidated: AtomicBool::new(true),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current snapshot. Never blocks.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Expired by TTL or explicitly invalidated.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.invalidated.load(Ordering::Acquire) || self.current.load().loaded_at.elapsed() >= self.ttl
    }

    /// Mark the snapshot stale without touching the store.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    /// Snapshot for serving a read. A stale snapshot is rebuilt first; if
    /// the store cannot be reached the previous snapshot is served and the
    /// cache stays stale, so the next read tries again.
    pub async fn current(&self) -> Arc<RegistrySnapshot> {
        if let Err(e) = self.refresh_if_stale().await {
            warn!(error = %e, "Registry cache rebuild failed; serving previous snapshot");
        }
        self.snapshot()
    }

    /// Rebuild from the store and swap in the result.
    ///
    /// Refreshes are serialized so a slow, older read can never overwrite a
    /// newer snapshot. On failure the previous snapshot stays in place and
    /// the cache is left invalidated.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let _guard = self.refresh_lock.lock().await;
        self.rebuild().await
    }

    /// Refresh only when stale. Returns whether a refresh happened.
    pub async fn refresh_if_stale(&self) -> Result<bool, StoreError> {
        if !self.is_stale() {
            return Ok(false);
        }
        let _guard = self.refresh_lock.lock().await;
        // Readers queued behind one rebuild reuse its result.
        if !self.is_stale() {
            return Ok(false);
        }
        self.rebuild().await?;
        Ok(true)
    }

    async fn rebuild(&self) -> Result<(), StoreError> {
        self.invalidated.store(false, Ordering::Release);

        let channels = match self.store.list().await {
            Ok(channels) => channels,
            Err(e) => {
                self.invalidate();
                return Err(e);
            }
        };

        let generation = self.current.load().generation + 1;
        let next = RegistrySnapshot::from_channels(channels, generation);
        debug!(enabled = next.len(), generation, "Registry cache refreshed");
        self.current.store(Arc::new(next));
        Ok(())
    }
}
