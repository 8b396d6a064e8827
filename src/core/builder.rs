use std::sync::Arc;

use crate::{
    core::{Config, EventBus},
    sinks::{DiagnosticSink, TracingSink},
};

/// Builder for constructing an [`EventBus`] with custom settings and sinks.
///
/// ```rust
/// use std::sync::Arc;
/// use chanbus::{Channel, Config, EventBus, MemorySink};
///
/// let failures = Arc::new(MemorySink::new());
/// let bus = EventBus::builder()
///     .with_config(Config { default_channel: Channel(1), ..Config::default() })
///     .with_sink(failures.clone())
///     .build();
///
/// assert_eq!(bus.config().default_channel, Channel(1));
/// ```
pub struct EventBusBuilder {
    cfg: Config,
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl EventBusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            sinks: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Adds one diagnostic sink; may be called repeatedly.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Sets all diagnostic sinks at once, replacing earlier ones.
    ///
    /// Sinks receive each failure in the order given here.
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Builds the bus.
    ///
    /// Without any configured sink the bus reports through [`TracingSink`].
    pub fn build(self) -> EventBus {
        let sinks = if self.sinks.is_empty() {
            vec![Arc::new(TracingSink::new()) as Arc<dyn DiagnosticSink>]
        } else {
            self.sinks
        };
        EventBus::from_parts(self.cfg, sinks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    #[test]
    fn tracing_sink_is_the_fallback() {
        let bus = EventBusBuilder::new(Config::default()).build();
        assert!(format!("{bus:?}").contains("TracingSink"));
    }

    #[test]
    fn with_sinks_replaces() {
        let bus = EventBus::builder()
            .with_sink(Arc::new(TracingSink::new()))
            .with_sinks(vec![Arc::new(MemorySink::new()) as Arc<dyn DiagnosticSink>])
            .build();
        let dbg = format!("{bus:?}");
        assert!(dbg.contains("MemorySink"));
        assert!(!dbg.contains("TracingSink"));
    }
}
