//! # MemorySink – keep failure reports in memory
//!
//! Records every reported [`ListenerError`] as a [`Report`] so tools and tests
//! can inspect what failed.
//!
//! ## Internal scheme
//! ```text
//! report(err):
//!   └─ push Report { label, listener, event, channel, message }  (drops oldest past `limit`)
//!
//! snapshot() -> Vec<Report>  (copy, oldest first)
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ListenerError;
use crate::events::Channel;
use crate::sinks::DiagnosticSink;

/// Owned copy of a listener failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Stable label from [`ListenerError::as_label`].
    pub label: &'static str,
    /// Display name of the failing registration.
    pub listener: String,
    /// Short event type name.
    pub event: &'static str,
    /// Channel of the publish.
    pub channel: Channel,
    /// Detail from [`ListenerError::as_message`].
    pub message: String,
}

impl From<&ListenerError> for Report {
    fn from(err: &ListenerError) -> Self {
        Self {
            label: err.as_label(),
            listener: err.listener().to_owned(),
            event: err.event(),
            channel: err.channel(),
            message: err.as_message(),
        }
    }
}

/// Bounded in-memory log of listener failures.
pub struct MemorySink {
    inner: Mutex<VecDeque<Report>>,
    limit: usize,
}

impl MemorySink {
    /// Creates an empty sink retaining up to 1024 reports.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            limit: 1024,
        }
    }

    /// Configure how many reports are retained (min 1).
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Returns a copy of the retained reports, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Report> {
        self.lock().iter().cloned().collect()
    }

    /// Number of retained reports.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops all retained reports.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Report>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, err: &ListenerError) {
        let mut g = self.lock();
        if g.len() == self.limit {
            g.pop_front();
        }
        g.push_back(Report::from(err));
    }

    fn name(&self) -> &'static str {
        "MemorySink"
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}
