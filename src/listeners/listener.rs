//! # Closure-backed listener handle (`Listener`)
//!
//! [`Listener<E>`] wraps a callback `Fn(&E)` (or `Fn(&E) -> ListenerResult`) and
//! gives it an identity. The caller keeps the handle and passes it to both
//! `add_listener` and `remove_listener`; the bus stores a clone of the callback.
//!
//! ## Identity
//! - Every `Listener::new`/`Listener::fallible` call draws a fresh [`ListenerId`].
//! - Clones share the id: they are "the same callback" for removal.
//! - Two listeners built from identical closures are still different listeners.
//!
//! ## Naming
//! The callback name defaults to the last two segments of the closure's type
//! path (`Hud.bind` for a closure defined inside `Hud::bind`). Override it with
//! [`Listener::with_name`] and attach an owner label with [`Listener::with_owner`].
//!
//! ## Example
//! ```rust
//! use chanbus::Listener;
//!
//! struct Ping;
//!
//! let a = Listener::new(|_: &Ping| {});
//! let b = a.clone();
//! let c = Listener::new(|_: &Ping| {});
//!
//! assert_eq!(a.id(), b.id());
//! assert_ne!(a.id(), c.id());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::error::BoxError;
use crate::events::Event;

/// Result returned by fallible listeners.
pub type ListenerResult = Result<(), BoxError>;

/// Shared callback behind a [`Listener`].
pub(crate) type Callback<E> = Arc<dyn Fn(&E) -> ListenerResult + Send + Sync>;

/// Global counter for listener identities.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a listener callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(LISTENER_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Caller-owned handle to a typed callback.
pub struct Listener<E: Event> {
    id: ListenerId,
    name: Cow<'static, str>,
    owner: Option<Cow<'static, str>>,
    callback: Callback<E>,
}

impl<E: Event> Listener<E> {
    /// Wraps an infallible callback. Panics inside it are caught by the bus.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let name = callback_name(std::any::type_name::<F>());
        Self::from_parts(name, Arc::new(move |event: &E| {
            f(event);
            Ok(())
        }))
    }

    /// Wraps a callback that reports failures through its return value.
    ///
    /// ```rust
    /// use chanbus::{Listener, ListenerResult};
    ///
    /// struct Save { slot: u8 }
    ///
    /// let saver = Listener::fallible(|ev: &Save| -> ListenerResult {
    ///     if ev.slot > 3 {
    ///         return Err(format!("no slot {}", ev.slot).into());
    ///     }
    ///     Ok(())
    /// });
    /// assert!(saver.name().len() > 0);
    /// ```
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&E) -> ListenerResult + Send + Sync + 'static,
    {
        let name = callback_name(std::any::type_name::<F>());
        Self::from_parts(name, Arc::new(f))
    }

    fn from_parts(name: String, callback: Callback<E>) -> Self {
        Self {
            id: ListenerId::next(),
            name: Cow::Owned(name),
            owner: None,
            callback,
        }
    }

    /// Replaces the derived callback name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Labels the object that owns this callback (diagnostics only).
    pub fn with_owner(mut self, owner: impl Into<Cow<'static, str>>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Identity used for removal.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Callback name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner label, if any.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub(crate) fn callback(&self) -> &Callback<E> {
        &self.callback
    }
}

impl<E: Event> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            owner: self.owner.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<E: Event> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Event> Eq for Listener<E> {}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Derives `Owner.method` from a closure or fn item type path.
///
/// `game::hud::Hud::bind::{{closure}}` → `Hud.bind`, `game::on_ping` → `game.on_ping`.
/// Generic arguments and trait qualifications are dropped:
/// `<game::Hud<u8> as game::Widget>::bind::{{closure}}` → `Hud.bind`.
pub(crate) fn callback_name(type_path: &str) -> String {
    let path = strip_generics(&unqualify(type_path));
    let segments: Vec<&str> = path
        .split("::")
        .filter(|s| !s.is_empty() && !s.starts_with("{{"))
        .collect();
    match segments.as_slice() {
        [] => type_path.to_string(),
        [only] => (*only).to_string(),
        [.., owner, method] => format!("{owner}.{method}"),
    }
}

/// Rewrites a leading `<Type as Trait>::rest` into `Type::rest`.
fn unqualify(path: &str) -> Cow<'_, str> {
    let Some(rest) = path.strip_prefix('<') else {
        return Cow::Borrowed(path);
    };
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &rest[..i];
                    let self_ty = inner.split_once(" as ").map_or(inner, |(ty, _)| ty);
                    return Cow::Owned(format!("{self_ty}{}", &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    Cow::Borrowed(path)
}

/// Removes every `<...>` argument list, nested ones included.
fn strip_generics(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
