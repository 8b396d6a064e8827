//! # Channel identifiers.
//!
//! A [`Channel`] partitions the bus into independent namespaces. Channels are
//! never declared up front: the registry creates a channel's map the first time
//! a listener is added on it.
//!
//! ```rust
//! use chanbus::Channel;
//!
//! assert_eq!(Channel::default(), Channel::DEFAULT);
//! assert_eq!(Channel::from(5).to_string(), "5");
//! ```

use std::fmt;

/// Integer partition key for listener buckets.
///
/// Listeners registered on one channel are never reached by a publish on
/// another, even when the event type matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Channel(pub i32);

impl Channel {
    /// Channel `0`, used when a caller does not name one.
    pub const DEFAULT: Channel = Channel(0);

    /// Returns the raw channel number.
    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for Channel {
    fn from(value: i32) -> Self {
        Channel(value)
    }
}

impl From<Channel> for i32 {
    fn from(value: Channel) -> Self {
        value.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(Channel::default().get(), 0);
        assert_eq!(Channel::DEFAULT, Channel(0));
    }

    #[test]
    fn negative_channels_are_distinct() {
        assert_ne!(Channel::from(-1), Channel::from(1));
        assert_eq!(i32::from(Channel(-7)), -7);
    }
}
