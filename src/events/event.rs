//! # Event marker trait.
//!
//! Any `'static + Send + Sync` type can be published. Its concrete Rust type is
//! the dispatch key, so `Ping` and `Pong` never share a bucket even if their
//! fields are identical.
//!
//! ```rust
//! use chanbus::Event;
//!
//! #[derive(Debug)]
//! struct Ping;
//!
//! fn assert_event<E: Event>() {}
//! assert_event::<Ping>();
//! assert_event::<String>();
//! ```

use std::any::{Any, TypeId};

/// Marker for values that can travel over the bus.
///
/// Implemented automatically for every eligible type.
pub trait Event: Any + Send + Sync + 'static {}

impl<T> Event for T where T: Any + Send + Sync + 'static {}

/// Dispatch key of `E`.
#[inline]
pub(crate) fn event_key<E: Event>() -> TypeId {
    TypeId::of::<E>()
}

/// Short label of `E`: the type path with its module prefix removed.
pub(crate) fn event_name<E: Event>() -> &'static str {
    short_type_name(std::any::type_name::<E>())
}

/// Strips the module path from a type name, leaving generic arguments as-is.
///
/// `game::input::Click` → `Click`, `game::Wrap<game::Click>` → `Wrap<game::Click>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}
