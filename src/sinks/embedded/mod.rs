//! # Built-in sinks
//!
//! - [`TracingSink`]: logs failures through `tracing` (the default).
//! - [`MemorySink`]: retains failures for inspection (tools/tests).

mod log;
mod memory;

pub use log::TracingSink;
pub use memory::{MemorySink, Report};
