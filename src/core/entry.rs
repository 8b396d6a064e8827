//! Type-erased listener registration stored in the registry.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::events::{Channel, Event, event_key, event_name};
use crate::listeners::{Listener, ListenerId, ListenerResult};

/// Callback with the event type erased; the bucket key guarantees the downcast.
type ErasedCallback = Arc<dyn Fn(&dyn Any) -> ListenerResult + Send + Sync>;

/// One registration of a callback in a `(channel, event type)` bucket.
///
/// Cloning is cheap (two `Arc` bumps) so the dispatcher can snapshot a bucket.
#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) id: ListenerId,
    pub(crate) channel: Channel,
    pub(crate) event_type: TypeId,
    pub(crate) event_name: &'static str,
    pub(crate) display_name: Arc<str>,
    callback: ErasedCallback,
}

impl ListenerEntry {
    pub(crate) fn new<E: Event>(channel: Channel, listener: &Listener<E>) -> Self {
        let event_name = event_name::<E>();
        let display_name: Arc<str> = match listener.owner() {
            Some(owner) => format!("{event_name}[{channel}] >> {owner} {}", listener.name()),
            None => format!("{event_name}[{channel}] >> {}", listener.name()),
        }
        .into();

        let typed = Arc::clone(listener.callback());
        let callback: ErasedCallback = Arc::new(move |event: &dyn Any| {
            match event.downcast_ref::<E>() {
                Some(event) => typed(event),
                None => {
                    debug_assert!(false, "event delivered to a bucket of another type");
                    tracing::warn!(
                        expected = std::any::type_name::<E>(),
                        "event type mismatch; listener skipped"
                    );
                    Ok(())
                }
            }
        });

        Self {
            id: listener.id(),
            channel,
            event_type: event_key::<E>(),
            event_name,
            display_name,
            callback,
        }
    }

    /// Runs the callback. Events of another type are skipped with a warning.
    pub(crate) fn invoke(&self, event: &dyn Any) -> ListenerResult {
        (self.callback)(event)
    }
}

impl std::fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Ping(usize);
    struct Pong;

    #[test]
    fn display_name_without_owner() {
        let l = Listener::new(|_: &Ping| {}).with_name("Radar.sweep");
        let entry = ListenerEntry::new(Channel(2), &l);
        assert_eq!(&*entry.display_name, "Ping[2] >> Radar.sweep");
        assert_eq!(entry.event_name, "Ping");
        assert_eq!(entry.id, l.id());
    }

    #[test]
    fn display_name_with_owner() {
        let l = Listener::new(|_: &Ping| {})
            .with_name("Radar.sweep")
            .with_owner("Player");
        let entry = ListenerEntry::new(Channel::DEFAULT, &l);
        assert_eq!(&*entry.display_name, "Ping[0] >> Player Radar.sweep");
    }

    #[test]
    fn invoke_forwards_event() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let l = Listener::new(move |p: &Ping| {
            s.fetch_add(p.0, Ordering::SeqCst);
        });
        let entry = ListenerEntry::new(Channel::DEFAULT, &l);

        entry.invoke(&Ping(5)).unwrap();
        entry.invoke(&Ping(2)).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(entry.event_type, event_key::<Ping>());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "bucket of another type")]
    fn mismatched_event_type_is_loud_in_debug() {
        let entry = ListenerEntry::new(Channel::DEFAULT, &Listener::new(|_: &Ping| {}));
        let _ = entry.invoke(&Pong);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn mismatched_event_type_is_skipped_in_release() {
        let entry = ListenerEntry::new(Channel::DEFAULT, &Listener::new(|_: &Ping| {}));
        assert!(entry.invoke(&Pong).is_ok());
    }
}
