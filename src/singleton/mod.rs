//! # Lazy host-managed singleton.
//!
//! - [`Host`] - object lifecycle primitives the engine provides
//! - [`LazySingleton`] - find-or-create shared instance with teardown freeze
//! - [`Claim`], [`SingletonState`] - creation hook outcome and observable phase

mod host;
mod lazy;

pub use host::Host;
pub use lazy::{Claim, LazySingleton, SingletonState};
