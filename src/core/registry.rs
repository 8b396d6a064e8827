//! # Listener registry - two-level map of ordered buckets.
//!
//! The registry owns every `ListenerEntry`. It is a plain data structure; the
//! [`EventBus`](crate::EventBus) wraps it in a mutex and never holds that lock
//! while a listener runs.
//!
//! ## Architecture
//! ```text
//! channels: HashMap<Channel, HashMap<TypeId, Vec<ListenerEntry>>>
//!
//!   Channel(0) ─┬─ TypeId(Ping) ─► [cb1, cb2, cb3]   (registration order)
//!               └─ TypeId(Tick) ─► [cbA]
//!   Channel(5) ─── TypeId(Tick) ─► [cbB]
//! ```
//!
//! ## Rules
//! - Channel first, then type: channels never merge at lookup.
//! - `add` appends; duplicates are kept and each is invoked.
//! - `remove` drops the **first** entry with a matching id only.
//! - Missing channel/bucket on `remove` or `lookup` is not an error.
//! - Nothing is collected automatically; empty buckets stay unless `prune_empty`.

use std::any::TypeId;
use std::collections::HashMap;

use crate::core::config::Config;
use crate::core::entry::ListenerEntry;
use crate::events::Channel;
use crate::listeners::ListenerId;

type Buckets = HashMap<TypeId, Vec<ListenerEntry>>;

/// Ordered listener storage keyed by `(channel, event type)`.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    channels: HashMap<Channel, Buckets>,
    bucket_capacity: usize,
    prune_empty: bool,
}

impl Registry {
    /// Creates an empty registry using the bucket settings from `cfg`.
    pub(crate) fn new(cfg: &Config) -> Self {
        Self {
            channels: HashMap::new(),
            bucket_capacity: cfg.bucket_capacity,
            prune_empty: cfg.prune_empty,
        }
    }

    /// Appends `entry` to its bucket, creating the channel/bucket on first use.
    pub(crate) fn add(&mut self, entry: ListenerEntry) {
        let capacity = self.bucket_capacity;
        self.channels
            .entry(entry.channel)
            .or_default()
            .entry(entry.event_type)
            .or_insert_with(|| Vec::with_capacity(capacity))
            .push(entry);
    }

    /// Removes the first entry in the bucket whose id equals `id`.
    pub(crate) fn remove(
        &mut self,
        channel: Channel,
        event_type: TypeId,
        id: ListenerId,
    ) -> Option<ListenerEntry> {
        let buckets = self.channels.get_mut(&channel)?;
        let bucket = buckets.get_mut(&event_type)?;
        let pos = bucket.iter().position(|e| e.id == id)?;
        let removed = bucket.remove(pos);

        if self.prune_empty && bucket.is_empty() {
            buckets.remove(&event_type);
            if buckets.is_empty() {
                self.channels.remove(&channel);
            }
        }
        Some(removed)
    }

    /// Live ordered bucket for `(channel, event_type)`; empty when absent.
    pub(crate) fn lookup(&self, channel: Channel, event_type: TypeId) -> &[ListenerEntry] {
        self.channels
            .get(&channel)
            .and_then(|buckets| buckets.get(&event_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of registrations across all channels.
    pub(crate) fn len(&self) -> usize {
        self.channels
            .values()
            .flat_map(|buckets| buckets.values())
            .map(Vec::len)
            .sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels that currently have a map (empty or not).
    #[cfg(test)]
    pub(crate) fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Drops every registration.
    pub(crate) fn clear(&mut self) {
        self.channels.clear();
    }

    /// Iterates all entries; bucket order is preserved, map order is not.
    #[cfg_attr(not(feature = "introspection"), allow(dead_code))]
    pub(crate) fn entries(&self) -> impl Iterator<Item = &ListenerEntry> {
        self.channels
            .values()
            .flat_map(|buckets| buckets.values())
            .flatten()
    }
}
