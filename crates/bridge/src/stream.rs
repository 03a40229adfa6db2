//! Line buffering for descriptor-style `write(fd, ptr, len)` output.
//!
//! Runtimes that print through a libc-like `write` hand the host arbitrary
//! chunks of bytes. Each descriptor keeps its own pending line; a message is
//! emitted for every completed line, without the trailing newline. Lines are
//! decoded only once complete, so a character split across writes survives.

use crate::bindings::{BridgeError, Severity};
use crate::handle::ConsoleHandle;
use core::mem;

/// Standard output descriptor.
pub const STDOUT: i32 = 1;
/// Standard error descriptor.
pub const STDERR: i32 = 2;

/// Map a descriptor to the console channel it writes to.
///
/// # Errors
/// Returns `BridgeError::InvalidDescriptor` for anything but stdout/stderr.
#[inline]
pub const fn severity_for(descriptor: i32) -> Result<Severity, BridgeError> {
    match descriptor {
        STDOUT => Ok(Severity::Info),
        STDERR => Ok(Severity::Error),
        other => Err(BridgeError::InvalidDescriptor(other)),
    }
}

/// Pending partial lines for stdout and stderr.
#[derive(Debug, Default, Clone)]
pub struct StreamWriter {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl StreamWriter {
    /// Create a writer with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_mut(&mut self, severity: Severity) -> &mut Vec<u8> {
        match severity {
            Severity::Info => &mut self.stdout,
            Severity::Error => &mut self.stderr,
        }
    }

    /// Text waiting for a newline on the given channel.
    pub fn pending(&self, severity: Severity) -> String {
        let bytes = match severity {
            Severity::Info => &self.stdout,
            Severity::Error => &self.stderr,
        };
        String::from_utf8_lossy(bytes).into_owned()
    }

    /// Append `bytes` to the descriptor's buffer and emit every completed line.
    ///
    /// # Errors
    /// Returns `BridgeError::InvalidDescriptor` when `descriptor` is not 1 or 2.
    pub fn write(
        &mut self,
        handle: &ConsoleHandle,
        descriptor: i32,
        bytes: &[u8],
    ) -> Result<(), BridgeError> {
        let severity = severity_for(descriptor)?;
        let pending = self.pending_mut(severity);
        let mut rest = bytes;
        while let Some(newline) = rest.iter().position(|byte| *byte == b'\n') {
            pending.extend_from_slice(&rest[..newline]);
            emit_line(handle, severity, &mem::take(pending));
            rest = &rest[newline + 1..];
        }
        pending.extend_from_slice(rest);
        Ok(())
    }

    /// Emit any unterminated lines. Called when the module is torn down.
    pub fn flush(&mut self, handle: &ConsoleHandle) {
        for severity in [Severity::Info, Severity::Error] {
            let pending = self.pending_mut(severity);
            if !pending.is_empty() {
                emit_line(handle, severity, &mem::take(pending));
            }
        }
    }
}

fn emit_line(handle: &ConsoleHandle, severity: Severity, line: &[u8]) {
    let text = String::from_utf8_lossy(line).into_owned();
    handle.emit(severity, &text.into());
}
