use core::fmt::{Display, Formatter, Result as FmtResult};
use std::error::Error;

/// Severity channels understood by the host console.
///
/// Only two exist: informational output routed through `log`, and problem
/// reports routed through `error`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational output (`log`).
    Info,
    /// Problem reports (`error`).
    Error,
}

impl Severity {
    /// Lowercase channel name.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(self.as_str())
    }
}

/// A single message emitted by module code.
///
/// The host copies the payload during the call; the caller keeps no
/// obligation to keep its data alive afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Text, possibly empty.
    Text(String),
    /// A signed integer rendered as decimal text by the host.
    Int(i64),
}

impl Display for Message {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Int(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Message {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Message {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Errors raised by the plumbing that connects a module to the bridge.
///
/// Output failures are never represented here: a host function that was
/// called correctly always succeeds. These variants only describe calls that
/// could not be decoded at all (wrong arity, unknown descriptor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A host function received the wrong number of arguments.
    Arity {
        /// Import name of the function.
        function: String,
        /// Number of arguments the function takes.
        expected: usize,
        /// Number of arguments that were supplied.
        actual: usize,
    },
    /// `write` was called with a descriptor other than stdout or stderr.
    InvalidDescriptor(i32),
    /// Lookup of a host function that is not part of the bindings.
    UnknownFunction {
        /// Import module name.
        module: String,
        /// Import field name.
        name: String,
    },
}

impl Display for BridgeError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Arity {
                function,
                expected,
                actual,
            } => write!(
                formatter,
                "{function} takes {expected} argument(s), got {actual}"
            ),
            Self::InvalidDescriptor(descriptor) => {
                write!(formatter, "invalid descriptor {descriptor} passed to write")
            }
            Self::UnknownFunction { module, name } => {
                write!(formatter, "no host function {module}.{name}")
            }
        }
    }
}

impl Error for BridgeError {}
