//! # Host object lifecycle trait.
//!
//! [`Host`] is the narrow interface a [`LazySingleton`](crate::LazySingleton)
//! needs from the engine that owns objects of type `T`.
//!
//! The teardown notification is not part of the trait: the host calls
//! [`LazySingleton::on_teardown_begin`](crate::LazySingleton::on_teardown_begin)
//! directly when application shutdown starts.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use chanbus::{BoxError, Host};
//!
//! struct Audio;
//!
//! #[derive(Default)]
//! struct Scene {
//!     live: Mutex<Vec<(String, Arc<Audio>)>>,
//! }
//!
//! impl Host<Audio> for Scene {
//!     fn find_existing(&self) -> Option<Arc<Audio>> {
//!         self.live.lock().unwrap().first().map(|(_, a)| a.clone())
//!     }
//!
//!     fn construct(&self, container: &str) -> Result<Arc<Audio>, BoxError> {
//!         let audio = Arc::new(Audio);
//!         self.live.lock().unwrap().push((container.to_owned(), audio.clone()));
//!         Ok(audio)
//!     }
//!
//!     fn destroy(&self, instance: &Arc<Audio>) {
//!         self.live.lock().unwrap().retain(|(_, a)| !Arc::ptr_eq(a, instance));
//!     }
//!
//!     fn make_persistent(&self, _instance: &Arc<Audio>) {}
//! }
//! ```

use std::sync::Arc;

use crate::error::BoxError;

/// Object lifecycle primitives provided by the host engine.
///
/// Instances are compared by `Arc` pointer identity.
pub trait Host<T: ?Sized> {
    /// Returns a live instance of `T` if the host already has one.
    fn find_existing(&self) -> Option<Arc<T>>;

    /// Creates a new managed container named `container` and attaches a fresh `T`.
    ///
    /// The host may run its own creation hook (calling
    /// [`LazySingleton::on_create`](crate::LazySingleton::on_create)) from here.
    fn construct(&self, container: &str) -> Result<Arc<T>, BoxError>;

    /// Destroys `instance` together with its container.
    fn destroy(&self, instance: &Arc<T>);

    /// Keeps `instance` alive across scene/context transitions.
    fn make_persistent(&self, instance: &Arc<T>);
}
