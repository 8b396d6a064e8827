//! Event data model: the [`Event`] marker and the [`Channel`] partition key.
//!
//! ## Contents
//! - [`Event`] blanket marker for publishable values
//! - [`Channel`] integer namespace, default `0`
//!
//! The dispatch key of a bucket is `(Channel, TypeId of the event)`.

mod channel;
mod event;

pub use channel::Channel;
pub use event::Event;

pub(crate) use event::{event_key, event_name, short_type_name};
