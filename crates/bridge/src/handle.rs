//! The console handle and the three bridge entry points.

use crate::bindings::{HostConsole, Message, Severity};
use crate::console::{LogConsole, RecordingConsole};
use core::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// Capability reference to the host console.
///
/// One handle exists per hosting context; cloning it only clones the
/// reference. Every method returns `()`: delivery problems are the console's
/// to absorb, so callers may invoke these from any code path, teardown
/// included.
#[derive(Clone)]
pub struct ConsoleHandle {
    console: Arc<dyn HostConsole>,
}

impl ConsoleHandle {
    /// Wrap an existing console.
    pub fn new(console: Arc<dyn HostConsole>) -> Self {
        Self { console }
    }

    /// Handle backed by a `LogConsole` with the given label.
    pub fn log_console<L: Into<String>>(label: L) -> Self {
        Self::new(Arc::new(LogConsole::new(label)))
    }

    /// Handle backed by a fresh `RecordingConsole`, returned alongside it.
    pub fn recording() -> (Self, Arc<RecordingConsole>) {
        let recorder = Arc::new(RecordingConsole::new());
        let console: Arc<dyn HostConsole> = Arc::<RecordingConsole>::clone(&recorder);
        (Self::new(console), recorder)
    }

    /// Route `message` to the informational channel.
    #[inline]
    pub fn log<M: Into<Message>>(&self, message: M) {
        self.emit(Severity::Info, &message.into());
    }

    /// Route `message` to the error channel.
    #[inline]
    pub fn error<M: Into<Message>>(&self, message: M) {
        self.emit(Severity::Error, &message.into());
    }

    /// Route an already-built message to the channel named by `severity`.
    pub fn emit(&self, severity: Severity, message: &Message) {
        match message {
            Message::Text(text) => self.console.emit(severity, text),
            Message::Int(_) => self.console.emit(severity, &message.to_string()),
        }
    }

    /// `logText`: text at Info severity.
    #[inline]
    pub fn log_text(&self, message: &str) {
        self.console.info(message);
    }

    /// `logInt`: the decimal form of `value` at Info severity.
    #[inline]
    pub fn log_int(&self, value: i64) {
        self.console.info(&value.to_string());
    }

    /// `reportError`: text at Error severity.
    #[inline]
    pub fn report_error(&self, message: &str) {
        self.console.error(message);
    }
}

impl Default for ConsoleHandle {
    fn default() -> Self {
        Self::new(Arc::new(LogConsole::default()))
    }
}

impl Debug for ConsoleHandle {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.debug_struct("ConsoleHandle").finish_non_exhaustive()
    }
}
