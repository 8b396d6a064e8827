//! # Diagnostic sinks for listener failures.
//!
//! This module provides the [`DiagnosticSink`] trait and built-in implementations
//! receiving the [`ListenerError`](crate::ListenerError)s produced during dispatch.
//!
//! ## Sink types
//! - **Reporting sinks** - forward failures somewhere (logs, crash reporters)
//! - **Retaining sinks** - keep failures for later inspection ([`MemorySink`])

mod embedded;
mod sink;

pub use embedded::{MemorySink, Report, TracingSink};
pub use sink::DiagnosticSink;
