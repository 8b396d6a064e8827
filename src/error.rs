//! Error types used by the bus and the lazy singleton.
//!
//! This module defines two main error enums:
//!
//! - [`ListenerError`] - a listener invocation that panicked or returned `Err`.
//!   These never reach the publisher; they are handed to the configured
//!   [`DiagnosticSink`](crate::DiagnosticSink)s.
//! - [`SingletonError`] - failures resolving a [`LazySingleton`](crate::LazySingleton).
//!
//! Both types provide `as_label` for logs/metrics.

use std::sync::Arc;

use thiserror::Error;

use crate::events::Channel;

/// Boxed error accepted from fallible listeners and host callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Failure of a single listener invocation.
///
/// Produced by the dispatcher, one per failed invocation. Delivery to the
/// remaining listeners of the same publish continues regardless.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener panicked; the panic was caught at the listener boundary.
    #[error("listener `{listener}` panicked on {event}[{channel}]: {message}")]
    Panicked {
        /// Display name of the listener registration.
        listener: Arc<str>,
        /// Short type name of the event being delivered.
        event: &'static str,
        /// Channel the event was published on.
        channel: Channel,
        /// Panic payload rendered as text.
        message: String,
    },

    /// The listener returned an error.
    #[error("listener `{listener}` failed on {event}[{channel}]: {source}")]
    Failed {
        /// Display name of the listener registration.
        listener: Arc<str>,
        /// Short type name of the event being delivered.
        event: &'static str,
        /// Channel the event was published on.
        channel: Channel,
        /// Error returned by the listener.
        #[source]
        source: BoxError,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use chanbus::{Channel, ListenerError};
    ///
    /// let err = ListenerError::Panicked {
    ///     listener: "Ping[0] >> Hud.refresh".into(),
    ///     event: "Ping",
    ///     channel: Channel::DEFAULT,
    ///     message: "boom".into(),
    /// };
    /// assert_eq!(err.as_label(), "listener_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Panicked { .. } => "listener_panicked",
            ListenerError::Failed { .. } => "listener_failed",
        }
    }

    /// Returns the failure detail without the listener prefix.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Panicked { message, .. } => format!("panic: {message}"),
            ListenerError::Failed { source, .. } => format!("error: {source}"),
        }
    }

    /// Display name of the failing listener registration.
    pub fn listener(&self) -> &str {
        match self {
            ListenerError::Panicked { listener, .. } | ListenerError::Failed { listener, .. } => {
                listener
            }
        }
    }

    /// Channel the failing delivery was published on.
    pub fn channel(&self) -> Channel {
        match self {
            ListenerError::Panicked { channel, .. } | ListenerError::Failed { channel, .. } => {
                *channel
            }
        }
    }

    /// Short type name of the event whose delivery failed.
    pub fn event(&self) -> &'static str {
        match self {
            ListenerError::Panicked { event, .. } | ListenerError::Failed { event, .. } => *event,
        }
    }
}

/// # Errors produced while resolving a lazy singleton.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SingletonError {
    /// Teardown has begun and no instance was ever recorded; the slot is frozen.
    #[error("{type_name} requested after teardown began; no instance recorded")]
    TearingDown {
        /// Short type name of the singleton.
        type_name: &'static str,
    },

    /// The host could not construct a fresh instance.
    #[error("host failed to construct {type_name}: {source}")]
    Construct {
        /// Short type name of the singleton.
        type_name: &'static str,
        /// Error reported by the host.
        #[source]
        source: BoxError,
    },
}

impl SingletonError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SingletonError::TearingDown { .. } => "singleton_tearing_down",
            SingletonError::Construct { .. } => "singleton_construct_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn failed_keeps_source_and_labels() {
        let err = ListenerError::Failed {
            listener: "Tick[3] >> Clock.advance".into(),
            event: "Tick",
            channel: Channel(3),
            source: "disk full".into(),
        };
        assert_eq!(err.as_label(), "listener_failed");
        assert_eq!(err.as_message(), "error: disk full");
        assert_eq!(err.listener(), "Tick[3] >> Clock.advance");
        assert_eq!(err.channel(), Channel(3));
        assert_eq!(err.event(), "Tick");
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "listener `Tick[3] >> Clock.advance` failed on Tick[3]: disk full"
        );
    }

    #[test]
    fn panicked_renders_message() {
        let err = ListenerError::Panicked {
            listener: "Ping[0] >> on_ping".into(),
            event: "Ping",
            channel: Channel::DEFAULT,
            message: "index out of bounds".into(),
        };
        assert_eq!(err.as_message(), "panic: index out of bounds");
        assert!(err.source().is_none());
    }

    #[test]
    fn singleton_labels() {
        let frozen = SingletonError::TearingDown { type_name: "Audio" };
        assert_eq!(frozen.as_label(), "singleton_tearing_down");
        assert!(frozen.to_string().contains("Audio"));

        let construct = SingletonError::Construct {
            type_name: "Audio",
            source: "no device".into(),
        };
        assert_eq!(construct.as_label(), "singleton_construct_failed");
        assert_eq!(construct.to_string(), "host failed to construct Audio: no device");
    }
}
