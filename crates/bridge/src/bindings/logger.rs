use super::values::Severity;

/// Output sink owned by the host and invoked by the bridge.
///
/// Implementations must serialize concurrent calls so that two messages never
/// interleave, and must absorb their own failures: nothing is returned to the
/// caller.
pub trait HostConsole: Send + Sync {
    /// Record a message on the informational channel.
    fn info(&self, message: &str);

    /// Record a message on the error channel.
    fn error(&self, message: &str);

    /// Record a message on the channel named by `severity`.
    #[inline]
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => self.info(message),
            Severity::Error => self.error(message),
        }
    }
}
