//! # Diagnostic sink trait.
//!
//! Provides [`DiagnosticSink`], the host diagnostic channel the dispatcher reports
//! listener failures to.
//!
//! ## Architecture
//! ```text
//! EventBus::publish ──► listener k ──► panic / Err
//!                                         │
//!                                         └─► ListenerError ──► sink.report(&err)  (every sink, in order)
//!                                                              (delivery continues with listener k+1)
//! ```
//!
//! ## Rules
//! - `report` runs synchronously on the publishing thread, after the failing
//!   listener returned and before the next listener runs.
//! - A sink that panics is contained like a listener; the panic is logged and
//!   the remaining sinks still receive the report.
//! - Sinks never affect dispatch: there is no way to abort a publish.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use chanbus::{DiagnosticSink, ListenerError};
//!
//! #[derive(Default)]
//! struct FailureCounter(AtomicUsize);
//!
//! impl DiagnosticSink for FailureCounter {
//!     fn report(&self, _err: &ListenerError) {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use crate::error::ListenerError;

/// Receiver of listener failure reports.
///
/// ### Implementation requirements
/// - Keep `report` short; it runs inline with dispatch.
/// - Do not publish on the same bus from `report` for the failing event type,
///   or a persistently failing listener will recurse.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Handles one failed listener invocation.
    fn report(&self, error: &ListenerError);

    /// Returns the sink name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
