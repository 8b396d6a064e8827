//! # TracingSink - default failure reporter
//!
//! Logs every listener failure through `tracing` at `error` level. Installed by
//! [`EventBusBuilder::build`](crate::EventBusBuilder::build) when no sink is configured.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! ERROR chanbus: listener invocation failed listener="Ping[0] >> Hud.refresh" channel=0 label="listener_panicked" error=panic: boom
//! ERROR chanbus: listener invocation failed listener="Save[2] >> Disk.write" channel=2 label="listener_failed" error=error: disk full
//! ```

use crate::error::ListenerError;
use crate::sinks::DiagnosticSink;

/// Sink writing failures to the `tracing` pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Construct a new [`TracingSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, err: &ListenerError) {
        tracing::error!(
            target: "chanbus",
            listener = %err.listener(),
            event = err.event(),
            channel = %err.channel(),
            label = err.as_label(),
            error = %err.as_message(),
            "listener invocation failed"
        );
    }

    fn name(&self) -> &'static str {
        "TracingSink"
    }
}
