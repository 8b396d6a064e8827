//! # Listener handles.
//!
//! - [`Listener`] - typed, cloneable callback handle with identity
//! - [`ListenerId`] - identity shared by clones, used for removal
//! - [`ListenerResult`] - return type of fallible callbacks

mod listener;

pub use listener::{Listener, ListenerId, ListenerResult};
