//! # Bus configuration.
//!
//! Provides [`Config`] centralized settings for an [`EventBus`](crate::EventBus).
//!
//! Config is used in two ways:
//! 1. **Registry setup**: initial bucket capacity and pruning behavior
//! 2. **Default channel**: the channel used by `add_listener`, `remove_listener`
//!    and `publish` when no channel is named
//!
//! ## Sentinel values
//! - `bucket_capacity = 0` → buckets start unallocated and grow on first push

use crate::events::Channel;

/// Configuration for an event bus.
///
/// ## Field semantics
/// - `default_channel`: channel for the non-`_on` methods (`0` unless changed)
/// - `bucket_capacity`: initial `Vec` capacity of a newly created bucket
/// - `prune_empty`: drop a bucket (and its channel) once its last entry is removed
///
/// ## Notes
/// All fields are public for flexibility, following struct-update construction:
/// ```rust
/// use chanbus::{Channel, Config};
///
/// let cfg = Config { default_channel: Channel(2), ..Config::default() };
/// assert_eq!(cfg.default_channel, Channel(2));
/// assert!(!cfg.prune_empty);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Channel used when a caller does not name one.
    pub default_channel: Channel,

    /// Initial capacity of a bucket created by the first registration for a
    /// `(channel, event type)` pair.
    pub bucket_capacity: usize,

    /// Remove empty buckets and channels after `remove_listener`.
    ///
    /// Off by default: empty buckets are cheap and are usually refilled by the
    /// same object on its next enable.
    pub prune_empty: bool,
}

impl Config {
    /// Returns `true` when buckets are pre-allocated.
    #[inline]
    pub fn preallocates(&self) -> bool {
        self.bucket_capacity > 0
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `default_channel = 0`
    /// - `bucket_capacity = 4` (a handful of listeners per event is typical)
    /// - `prune_empty = false`
    fn default() -> Self {
        Self {
            default_channel: Channel::DEFAULT,
            bucket_capacity: 4,
            prune_empty: false,
        }
    }
}
