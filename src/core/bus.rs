//! # Event bus: typed registration and isolated dispatch.
//!
//! [`EventBus`] owns a `Registry` behind one coarse mutex and delivers events
//! synchronously on the publishing thread.
//!
//! ## Architecture
//! ```text
//! add_listener_on(ch, &Listener<E>) ──► lock ─► Registry::add(entry)          ─► unlock
//! remove_listener_on(ch, &Listener<E>) ─► lock ─► Registry::remove(first id)  ─► unlock
//!
//! publish_on(ch, event: E)
//!   ├─► lock ─► snapshot = Registry::lookup(ch, TypeId::of::<E>()).to_vec() ─► unlock
//!   ├─► snapshot empty → return (no-op)
//!   └─► for entry in snapshot (registration order):
//!          catch_unwind(entry.invoke(&event))
//!            ├─ Ok(Ok(()))  → next
//!            ├─ Ok(Err(e))  → ListenerError::Failed   ─► sinks
//!            └─ Err(panic)  → ListenerError::Panicked ─► sinks
//! ```
//!
//! ## Rules
//! - **Order**: registration order within a bucket, stable across publishes.
//! - **Isolation**: a failing listener never stops delivery to the next one and
//!   never reaches the publisher.
//! - **Re-entrancy**: the lock is released before any listener runs. Listeners
//!   added during a publish wait for the next publish; listeners removed during
//!   a publish still see the current event.
//! - **No-ops**: publishing or removing on an unknown channel/type does nothing.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave listener state
//! inconsistent if a listener panics while mutating shared data.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::builder::EventBusBuilder;
use crate::core::config::Config;
use crate::core::entry::ListenerEntry;
use crate::core::registry::Registry;
use crate::error::ListenerError;
use crate::events::{Channel, Event, event_key, event_name};
use crate::listeners::Listener;
use crate::sinks::DiagnosticSink;

/// Typed publish/subscribe dispatcher partitioned by [`Channel`].
///
/// ### Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use chanbus::{EventBus, Listener};
///
/// struct Ping;
///
/// let bus = EventBus::new();
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let l = log.clone();
/// let cb1 = Listener::new(move |_: &Ping| l.lock().unwrap().push("cb1"));
/// let l = log.clone();
/// let cb2 = Listener::new(move |_: &Ping| l.lock().unwrap().push("cb2"));
///
/// bus.add_listener(&cb1);
/// bus.add_listener(&cb2);
/// bus.publish(Ping);
///
/// bus.remove_listener(&cb1);
/// bus.publish(Ping);
///
/// assert_eq!(*log.lock().unwrap(), vec!["cb1", "cb2", "cb2"]);
/// ```
pub struct EventBus {
    registry: Mutex<Registry>,
    sinks: Vec<Arc<dyn DiagnosticSink>>,
    cfg: Config,
}

impl EventBus {
    /// Creates a bus with [`Config::default`] and the [`TracingSink`](crate::TracingSink).
    #[must_use]
    pub fn new() -> Self {
        EventBusBuilder::new(Config::default()).build()
    }

    /// Starts a builder with the default configuration.
    #[must_use]
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new(Config::default())
    }

    pub(crate) fn from_parts(cfg: Config, sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self {
            registry: Mutex::new(Registry::new(&cfg)),
            sinks,
            cfg,
        }
    }

    /// Configuration this bus was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers `listener` on the default channel.
    pub fn add_listener<E: Event>(&self, listener: &Listener<E>) {
        self.add_listener_on(self.cfg.default_channel, listener);
    }

    /// Appends `listener` to the `(channel, E)` bucket.
    ///
    /// Registering the same listener twice yields two invocations per publish.
    pub fn add_listener_on<E: Event>(&self, channel: impl Into<Channel>, listener: &Listener<E>) {
        let entry = ListenerEntry::new(channel.into(), listener);
        tracing::debug!(listener = %entry.display_name, id = %entry.id, "listener added");
        self.registry().add(entry);
    }

    /// Removes one registration of `listener` from the default channel.
    pub fn remove_listener<E: Event>(&self, listener: &Listener<E>) -> bool {
        self.remove_listener_on(self.cfg.default_channel, listener)
    }

    /// Removes the first registration of `listener` from the `(channel, E)` bucket.
    ///
    /// Returns `true` when a registration was removed. Unknown channels, types
    /// and listeners are silently ignored.
    pub fn remove_listener_on<E: Event>(
        &self,
        channel: impl Into<Channel>,
        listener: &Listener<E>,
    ) -> bool {
        let removed = self
            .registry()
            .remove(channel.into(), event_key::<E>(), listener.id());
        match removed {
            Some(entry) => {
                tracing::debug!(listener = %entry.display_name, id = %entry.id, "listener removed");
                true
            }
            None => false,
        }
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Publishes `event` on the default channel.
    pub fn publish<E: Event>(&self, event: E) {
        self.publish_ref_on(self.cfg.default_channel, &event);
    }

    /// Publishes `event` on `channel`.
    pub fn publish_on<E: Event>(&self, channel: impl Into<Channel>, event: E) {
        self.publish_ref_on(channel, &event);
    }

    /// Publishes a borrowed event on the default channel.
    pub fn publish_ref<E: Event>(&self, event: &E) {
        self.publish_ref_on(self.cfg.default_channel, event);
    }

    /// Publishes a borrowed event on `channel`.
    ///
    /// Invokes the listeners registered for `(channel, E)` at the moment of the
    /// call, in registration order. Failures are reported to the sinks.
    pub fn publish_ref_on<E: Event>(&self, channel: impl Into<Channel>, event: &E) {
        let channel = channel.into();
        let snapshot: Vec<ListenerEntry> =
            self.registry().lookup(channel, event_key::<E>()).to_vec();
        if snapshot.is_empty() {
            return;
        }

        tracing::trace!(
            event = event_name::<E>(),
            channel = %channel,
            listeners = snapshot.len(),
            "publishing"
        );

        let event: &dyn Any = event;
        for entry in &snapshot {
            if let Some(err) = Self::invoke(entry, channel, event) {
                self.report(&err);
            }
        }
    }

    /// Runs one listener, converting a panic or `Err` into a [`ListenerError`].
    fn invoke(entry: &ListenerEntry, channel: Channel, event: &dyn Any) -> Option<ListenerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| entry.invoke(event))) {
            Ok(Ok(())) => None,
            Ok(Err(source)) => Some(ListenerError::Failed {
                listener: Arc::clone(&entry.display_name),
                event: entry.event_name,
                channel,
                source,
            }),
            Err(payload) => Some(ListenerError::Panicked {
                listener: Arc::clone(&entry.display_name),
                event: entry.event_name,
                channel,
                message: panic_message(&*payload),
            }),
        }
    }

    /// Hands `err` to every sink; a panicking sink is logged and skipped.
    fn report(&self, err: &ListenerError) {
        for sink in &self.sinks {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| sink.report(err))) {
                tracing::warn!(
                    sink = sink.name(),
                    panic = %panic_message(&*payload),
                    "diagnostic sink panicked"
                );
            }
        }
    }

    // ---------------------------
    // Inspection
    // ---------------------------

    /// Number of registrations in the `(channel, E)` bucket.
    pub fn listener_count<E: Event>(&self, channel: impl Into<Channel>) -> usize {
        self.registry().lookup(channel.into(), event_key::<E>()).len()
    }

    /// Total number of registrations on all channels.
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Drops every registration on every channel.
    pub fn clear(&self) {
        self.registry().clear();
        tracing::debug!("all listeners cleared");
    }

    /// Registered listeners sorted by display name (ordinal).
    #[cfg(feature = "introspection")]
    pub fn listeners(&self) -> Vec<crate::introspection::ListenerInfo> {
        crate::introspection::collect(&self.registry())
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sinks: Vec<&'static str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .field("sinks", &sinks)
            .field("cfg", &self.cfg)
            .finish()
    }
}

/// Renders a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    struct Ping;

    fn bus_with_memory() -> (EventBus, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let bus = EventBus::builder().with_sink(sink.clone()).build();
        (bus, sink)
    }

    #[test]
    fn panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }

    #[test]
    fn publish_without_listeners_is_noop() {
        let (bus, sink) = bus_with_memory();
        bus.publish(Ping);
        bus.publish_on(7, Ping);
        assert!(sink.is_empty());
        assert!(bus.is_empty());
    }

    #[test]
    fn counts_follow_registrations() {
        let bus = EventBus::new();
        let l = Listener::new(|_: &Ping| {});
        bus.add_listener(&l);
        bus.add_listener(&l);
        bus.add_listener_on(3, &l);

        assert_eq!(bus.listener_count::<Ping>(Channel::DEFAULT), 2);
        assert_eq!(bus.listener_count::<Ping>(3), 1);
        assert_eq!(bus.len(), 3);

        assert!(bus.remove_listener(&l));
        assert_eq!(bus.listener_count::<Ping>(Channel::DEFAULT), 1);

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn panic_is_reported_with_listener_name() {
        let (bus, sink) = bus_with_memory();
        let l = Listener::new(|_: &Ping| panic!("kaboom")).with_name("Hud.refresh");
        bus.add_listener(&l);
        bus.publish(Ping);

        let reports = sink.snapshot();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label, "listener_panicked");
        assert_eq!(reports[0].listener, "Ping[0] >> Hud.refresh");
        assert_eq!(reports[0].message, "panic: kaboom");
    }

    #[test]
    fn debug_lists_sinks() {
        let (bus, _sink) = bus_with_memory();
        let dbg = format!("{bus:?}");
        assert!(dbg.contains("MemorySink"), "{dbg}");
    }
}
