//! # Listener introspection (feature `introspection`).
//!
//! Read-only view of the registry for debug overlays and editor panels. It has
//! no effect on dispatch.
//!
//! ```rust
//! use chanbus::{EventBus, Listener};
//!
//! struct Tick;
//!
//! let bus = EventBus::new();
//! bus.add_listener_on(2, &Listener::new(|_: &Tick| {}).with_name("Clock.advance"));
//! bus.add_listener(&Listener::new(|_: &Tick| {}).with_name("Anim.step").with_owner("Hero"));
//!
//! let names: Vec<String> = bus.listeners().into_iter().map(|l| l.name.to_string()).collect();
//! assert_eq!(names, ["Tick[0] >> Hero Anim.step", "Tick[2] >> Clock.advance"]);
//! ```

use std::sync::Arc;

use crate::core::registry::Registry;
use crate::events::Channel;
use crate::listeners::ListenerId;

/// Snapshot of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerInfo {
    /// Identity of the registered callback.
    pub id: ListenerId,
    /// Channel of the registration.
    pub channel: Channel,
    /// Short event type name.
    pub event: &'static str,
    /// Display name, e.g. `Ping[0] >> Player Hud.refresh`.
    pub name: Arc<str>,
}

/// Collects every registration, sorted by display name (byte order).
///
/// Equal names (duplicate registrations) keep their registration order.
pub(crate) fn collect(registry: &Registry) -> Vec<ListenerInfo> {
    let mut out: Vec<ListenerInfo> = registry
        .entries()
        .map(|e| ListenerInfo {
            id: e.id,
            channel: e.channel,
            event: e.event_name,
            name: Arc::clone(&e.display_name),
        })
        .collect();
    out.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    out
}
