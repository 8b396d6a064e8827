//! # chanbus
//!
//! **chanbus** is a typed, in-process publish/subscribe event bus for game
//! engines, with numbered channels and a lazy host-managed singleton.
//!
//! Engine objects exchange strongly-typed event values without holding
//! references to each other. Every listener is keyed by `(channel, event type)`;
//! a publish reaches exactly the listeners of that pair, in registration order.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Listener<Ping>   Listener<Ping>   Listener<Tick>
//!   (hud, cb1)       (audio, cb2)     (clock, cbA)
//!        │                │                │
//!        │ add_listener   │ add_listener   │ add_listener_on(5)
//!        ▼                ▼                ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  EventBus                                                     │
//! │  - Mutex<Registry>   channel → TypeId → [ListenerEntry, ...]  │
//! │  - sinks             Vec<Arc<dyn DiagnosticSink>>             │
//! │  - Config            default channel, bucket settings         │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │ publish(Ping)  (channel 0)
//!                                ▼
//!                 snapshot bucket (0, Ping) ─► unlock
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!           cb1(&Ping)                     cb2(&Ping)
//!            panic / Err ─► ListenerError ─► sinks (TracingSink by default)
//! ```
//!
//! ### Lazy singleton
//! ```text
//! LazySingleton<T>::instance(&host)
//!   ├─ Set / Frozen(Some) ─► recorded instance
//!   ├─ Frozen(None)       ─► SingletonError::TearingDown
//!   └─ Unset ─► host.find_existing() ─► adopt
//!               └─ none ─► host.construct("T (Singleton)") ─► on_create ─► make_persistent
//! ```
//!
//! ## Features
//! | Area            | Description                                                       | Key types                          |
//! |-----------------|-------------------------------------------------------------------|------------------------------------|
//! | **Dispatch**    | Ordered, synchronous, failure-isolated delivery                   | [`EventBus`], [`Listener`]         |
//! | **Channels**    | Independent namespaces created on first use                       | [`Channel`]                        |
//! | **Diagnostics** | Listener panics/errors reported, never propagated                 | [`DiagnosticSink`], [`TracingSink`], [`MemorySink`] |
//! | **Singleton**   | Find-or-create shared host object, frozen on teardown             | [`LazySingleton`], [`Host`]        |
//!
//! ## Optional features
//! - `introspection` _(default)_: [`EventBus::listeners`] lists registrations
//!   with display names for debug overlays and editor panels.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use chanbus::{EventBus, Listener, ListenerResult, MemorySink};
//!
//! #[derive(Debug)]
//! struct Damage { amount: u32 }
//!
//! let failures = Arc::new(MemorySink::new());
//! let bus = EventBus::builder().with_sink(failures.clone()).build();
//!
//! let shield = Listener::fallible(|d: &Damage| -> ListenerResult {
//!     if d.amount > 100 {
//!         return Err("shield overloaded".into());
//!     }
//!     Ok(())
//! });
//! let hud = Listener::new(|d: &Damage| println!("took {} damage", d.amount));
//!
//! bus.add_listener(&shield);
//! bus.add_listener(&hud);
//!
//! // The shield fails, the HUD still updates, and publish never errors.
//! bus.publish(Damage { amount: 250 });
//! assert_eq!(failures.len(), 1);
//!
//! bus.remove_listener(&shield);
//! bus.publish(Damage { amount: 250 });
//! assert_eq!(failures.len(), 1);
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod singleton;
mod sinks;

// ---- Public re-exports ----

pub use crate::core::{Config, EventBus, EventBusBuilder};
pub use error::{BoxError, ListenerError, SingletonError};
pub use events::{Channel, Event};
pub use listeners::{Listener, ListenerId, ListenerResult};
pub use singleton::{Claim, Host, LazySingleton, SingletonState};
pub use sinks::{DiagnosticSink, MemorySink, Report, TracingSink};

// Optional: listener listing for tooling.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "introspection")]
mod introspection;
#[cfg(feature = "introspection")]
pub use introspection::ListenerInfo;
