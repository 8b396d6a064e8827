//! # LazySingleton – find-or-create access to one host-managed instance
//!
//! Holds the shared instance of a host-managed type `T` and resolves it on
//! demand through a [`Host`].
//!
//! ## State machine
//! ```text
//!            instance(): found or created
//!   Unset ───────────────────────────────► Set
//!     │                                     │
//!     │ on_teardown_begin()                 │ on_teardown_begin()
//!     ▼                                     ▼
//!   Frozen(None) ◄─────────────── Frozen(Some(last)) ── terminal
//! ```
//!
//! ## Rules
//! - `instance()` in `Set` returns the recorded instance without asking the host.
//! - `instance()` in `Unset` prefers `host.find_existing()` over `host.construct()`.
//! - After teardown began the slot never changes: lookups return the last known
//!   instance and never search or construct.
//! - `on_create()` is first-registered-wins: a different instance arriving while
//!   the slot is taken is destroyed through the host.
//! - Whatever gets recorded (created or adopted) is made persistent once.
//! - The slot lock is never held across a host call, so a host whose
//!   `construct` re-enters `on_create` does not deadlock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SingletonError;
use crate::events::short_type_name;
use crate::singleton::Host;

/// Observable phase of a [`LazySingleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingletonState {
    /// Nothing recorded yet.
    Unset,
    /// An instance is recorded.
    Set,
    /// Teardown began; the slot is frozen.
    Frozen,
}

/// Outcome of [`LazySingleton::on_create`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The candidate is (now) the shared instance and was made persistent.
    Claimed,
    /// Another instance already holds the slot; the candidate was destroyed.
    Duplicate,
    /// Teardown began with no instance recorded; the candidate was left alone.
    Ignored,
}

enum Slot<T: ?Sized> {
    Unset,
    Set(Arc<T>),
    Frozen(Option<Arc<T>>),
}

/// Lazily resolved, process-wide shared instance of `T`.
///
/// Usable in a `static`:
/// ```rust
/// use chanbus::{LazySingleton, SingletonState};
///
/// struct Audio;
/// static AUDIO: LazySingleton<Audio> = LazySingleton::new();
///
/// assert_eq!(AUDIO.state(), SingletonState::Unset);
/// AUDIO.on_teardown_begin();
/// assert_eq!(AUDIO.state(), SingletonState::Frozen);
/// assert!(AUDIO.peek().is_none());
/// ```
pub struct LazySingleton<T: ?Sized> {
    slot: Mutex<Slot<T>>,
}

impl<T: ?Sized + 'static> LazySingleton<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Unset),
        }
    }

    /// Returns the shared instance, searching for or constructing it if needed.
    ///
    /// # Errors
    /// - [`SingletonError::TearingDown`] if teardown began before any instance
    ///   was recorded.
    /// - [`SingletonError::Construct`] if the host failed to build a new one.
    pub fn instance<H>(&self, host: &H) -> Result<Arc<T>, SingletonError>
    where
        H: Host<T> + ?Sized,
    {
        match &*self.lock() {
            Slot::Set(current) | Slot::Frozen(Some(current)) => return Ok(Arc::clone(current)),
            Slot::Frozen(None) => {
                return Err(SingletonError::TearingDown {
                    type_name: Self::type_name(),
                });
            }
            Slot::Unset => {}
        }

        if let Some(found) = host.find_existing() {
            return Ok(self.adopt(host, found));
        }

        let container = format!("{} (Singleton)", Self::type_name());
        let created = host
            .construct(&container)
            .map_err(|source| SingletonError::Construct {
                type_name: Self::type_name(),
                source,
            })?;

        match self.on_create(host, &created) {
            Claim::Claimed | Claim::Ignored => Ok(created),
            Claim::Duplicate => self.peek().ok_or(SingletonError::TearingDown {
                type_name: Self::type_name(),
            }),
        }
    }

    /// Creation hook: the host calls this when a new `T` comes to life.
    ///
    /// First-registered wins. The losing candidate is destroyed through the host;
    /// the winner is made persistent across context transitions. Every recorded
    /// instance is persisted exactly once, when it is recorded, so reporting the
    /// recorded instance again returns [`Claim::Claimed`] without host calls.
    pub fn on_create<H>(&self, host: &H, candidate: &Arc<T>) -> Claim
    where
        H: Host<T> + ?Sized,
    {
        let (claim, fresh) = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Set(current) | Slot::Frozen(Some(current)) => {
                    if Arc::ptr_eq(current, candidate) {
                        (Claim::Claimed, false)
                    } else {
                        (Claim::Duplicate, false)
                    }
                }
                Slot::Frozen(None) => (Claim::Ignored, false),
                Slot::Unset => {
                    *slot = Slot::Set(Arc::clone(candidate));
                    (Claim::Claimed, true)
                }
            }
        };

        match claim {
            Claim::Claimed if !fresh => {}
            Claim::Claimed => {
                tracing::debug!(singleton = Self::type_name(), "instance claimed");
                host.make_persistent(candidate);
            }
            Claim::Duplicate => {
                tracing::warn!(singleton = Self::type_name(), "duplicate instance destroyed");
                host.destroy(candidate);
            }
            Claim::Ignored => {
                tracing::debug!(
                    singleton = Self::type_name(),
                    "instance created during teardown left unclaimed"
                );
            }
        }
        claim
    }

    /// Teardown hook: freezes the slot with whatever instance is recorded.
    ///
    /// Idempotent.
    pub fn on_teardown_begin(&self) {
        let mut slot = self.lock();
        let last = match std::mem::replace(&mut *slot, Slot::Frozen(None)) {
            Slot::Unset => None,
            Slot::Set(current) => Some(current),
            Slot::Frozen(last) => {
                *slot = Slot::Frozen(last);
                return;
            }
        };
        tracing::info!(
            singleton = Self::type_name(),
            has_instance = last.is_some(),
            "teardown began; singleton frozen"
        );
        *slot = Slot::Frozen(last);
    }

    /// Recorded instance, without resolving.
    pub fn peek(&self) -> Option<Arc<T>> {
        match &*self.lock() {
            Slot::Set(current) | Slot::Frozen(Some(current)) => Some(Arc::clone(current)),
            Slot::Unset | Slot::Frozen(None) => None,
        }
    }

    /// Current phase.
    pub fn state(&self) -> SingletonState {
        match &*self.lock() {
            Slot::Unset => SingletonState::Unset,
            Slot::Set(_) => SingletonState::Set,
            Slot::Frozen(_) => SingletonState::Frozen,
        }
    }

    /// Records `found` unless something got recorded meanwhile, and makes it
    /// persistent when it becomes the shared instance.
    fn adopt<H>(&self, host: &H, found: Arc<T>) -> Arc<T>
    where
        H: Host<T> + ?Sized,
    {
        {
            let mut slot = self.lock();
            match &*slot {
                Slot::Set(current) | Slot::Frozen(Some(current)) => return Arc::clone(current),
                Slot::Frozen(None) => return found,
                Slot::Unset => *slot = Slot::Set(Arc::clone(&found)),
            }
        }
        tracing::debug!(singleton = Self::type_name(), "existing instance adopted");
        host.make_persistent(&found);
        found
    }

    fn type_name() -> &'static str {
        short_type_name(std::any::type_name::<T>())
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ?Sized + 'static> Default for LazySingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for LazySingleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySingleton")
            .field("type", &Self::type_name())
            .field("state", &self.state())
            .finish()
    }
}
