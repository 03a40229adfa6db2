//! Host console surfaces.
//!
//! Output from sandboxed modules ends up here. The production surface prints
//! through the `log` crate; the recording surface keeps every message in an
//! ordered in-memory list so callers can assert on it.

use crate::bindings::{HostConsole, Severity};
use log::{error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Label used when no other label is configured.
pub const DEFAULT_LABEL: &str = "WASM";

/// A `HostConsole` that prints through the `log` facade.
#[derive(Clone, Debug)]
pub struct LogConsole {
    label: String,
}

impl LogConsole {
    /// Create a console whose lines are prefixed with `[label]: `.
    pub fn new<L: Into<String>>(label: L) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Prefix used for every line.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Print a trap or load failure with its optional backtrace.
    pub fn exception<M: AsRef<str>>(&self, message: M, trace: Option<&str>) {
        match trace {
            Some(trace_text) if !trace_text.is_empty() => {
                error!("[{}]: {}\n{}", self.label, message.as_ref(), trace_text);
            }
            _ => {
                error!("[{}]: {}", self.label, message.as_ref());
            }
        }
    }
}

impl Default for LogConsole {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL)
    }
}

impl HostConsole for LogConsole {
    #[inline]
    fn info(&self, message: &str) {
        info!("[{}]: {}", self.label, message);
    }

    #[inline]
    fn error(&self, message: &str) {
        error!("[{}]: {}", self.label, message);
    }
}

/// One message observed by a `RecordingConsole`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleRecord {
    /// Channel the message arrived on.
    pub severity: Severity,
    /// Text exactly as the host received it.
    pub content: String,
}

impl ConsoleRecord {
    /// Build a record.
    pub fn new<C: Into<String>>(severity: Severity, content: C) -> Self {
        Self {
            severity,
            content: content.into(),
        }
    }
}

/// A `HostConsole` that keeps every message in arrival order.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    records: Mutex<Vec<ConsoleRecord>>,
}

impl RecordingConsole {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written record, so
    // a poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<ConsoleRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<ConsoleRecord> {
        self.lock().clone()
    }

    /// Contents of the informational records, in order.
    pub fn info_lines(&self) -> Vec<String> {
        self.lines(Severity::Info)
    }

    /// Contents of the error records, in order.
    pub fn error_lines(&self) -> Vec<String> {
        self.lines(Severity::Error)
    }

    fn lines(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|record| record.severity == severity)
            .map(|record| record.content.clone())
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all records.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn push(&self, severity: Severity, message: &str) {
        self.lock().push(ConsoleRecord::new(severity, message));
    }
}

impl HostConsole for RecordingConsole {
    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }
}
