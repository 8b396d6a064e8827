//! Bus core: registry and dispatch.
//!
//! The only public API from this module is [`EventBus`], its builder and
//! [`Config`].
//!
//! Internal modules:
//! - `entry`: type-erased registration of one callback;
//! - `registry`: `(channel, event type)` → ordered bucket storage;
//! - `bus`: locking, snapshot dispatch and failure isolation;
//! - `builder`: bus construction with sinks;
//! - `config`: bus settings.

mod builder;
mod bus;
mod config;
pub(crate) mod entry;
pub(crate) mod registry;

pub use builder::EventBusBuilder;
pub use bus::EventBus;
pub use config::Config;
