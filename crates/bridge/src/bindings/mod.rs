//! Engine-agnostic description of the host functions a module may import.
//!
//! This module defines the value types and the import table that let a
//! WebAssembly adapter install the console bridge into any runtime without
//! this crate depending on runtime-specific APIs. An adapter looks up each
//! function's `HostFnKind`, registers a callback with the matching arity and
//! forwards the raw `i32` arguments plus a view of guest memory to
//! `HostFnKind::invoke`.

use std::collections::BTreeMap;

mod values;
pub use values::{BridgeError, Message, Severity};
mod logger;
pub use logger::HostConsole;
pub mod memory;

use crate::handle::ConsoleHandle;
use crate::stream::StreamWriter;

/// Per-module state reachable from host callbacks.
#[derive(Debug, Default)]
pub struct HostContext {
    /// Name of the loaded module, for host-side diagnostics.
    pub module_name: Option<String>,
    /// Console the module writes to.
    pub handle: ConsoleHandle,
    /// Pending partial lines from `write`.
    pub streams: StreamWriter,
}

impl HostContext {
    /// Create a context around a console handle.
    pub fn new(handle: ConsoleHandle) -> Self {
        Self {
            module_name: None,
            handle,
            streams: StreamWriter::new(),
        }
    }

    /// Emit pending partial lines.
    pub fn flush(&mut self) {
        self.streams.flush(&self.handle);
    }
}

/// How a host function decodes its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostFnKind {
    /// `(ptr)`: NUL-terminated text routed at the given severity.
    CString(Severity),
    /// `(ptr, len)`: sized text routed at the given severity.
    Sized(Severity),
    /// `(value)`: a signed integer logged at Info.
    Int,
    /// `(fd, ptr, len)`: line-buffered write to stdout or stderr.
    Write,
}

impl HostFnKind {
    /// Number of `i32` parameters the function takes. None return a value.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            Self::CString(_) | Self::Int => 1,
            Self::Sized(_) => 2,
            Self::Write => 3,
        }
    }

    /// Decode `args` against `memory` and deliver the message.
    ///
    /// Pointers are reinterpreted as unsigned offsets.
    ///
    /// # Errors
    /// Returns `BridgeError::Arity` if `args` has the wrong length, or
    /// `BridgeError::InvalidDescriptor` for a `write` to an unknown descriptor.
    pub fn invoke(
        self,
        name: &str,
        context: &mut HostContext,
        memory: &[u8],
        args: &[i32],
    ) -> Result<(), BridgeError> {
        match (self, args) {
            (Self::CString(severity), &[ptr]) => {
                let text = memory::read_c_string(memory, ptr as u32);
                context.handle.emit(severity, &Message::Text(text));
            }
            (Self::Sized(severity), &[ptr, len]) => {
                let text = memory::read_string(memory, ptr as u32, len as u32);
                context.handle.emit(severity, &Message::Text(text));
            }
            (Self::Int, &[value]) => context.handle.log_int(i64::from(value)),
            (Self::Write, &[descriptor, ptr, len]) => {
                let bytes = memory::read_bytes(memory, ptr as u32, len as u32);
                context.streams.write(&context.handle, descriptor, bytes)?;
            }
            _ => {
                return Err(BridgeError::Arity {
                    function: name.to_owned(),
                    expected: self.arity(),
                    actual: args.len(),
                });
            }
        }
        Ok(())
    }
}

/// A named group of host functions (one WebAssembly import module).
pub struct HostNamespace {
    /// Functions keyed by import field name.
    pub functions: BTreeMap<String, HostFnKind>,
}

impl HostNamespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    /// Register a function.
    pub fn with_fn(mut self, name: &str, kind: HostFnKind) -> Self {
        self.functions.insert(name.to_owned(), kind);
        self
    }
}

impl Default for HostNamespace {
    fn default() -> Self {
        Self::new()
    }
}

/// All namespaces to be offered to a module.
pub struct HostBindings {
    /// Mapping from import module name to its functions.
    pub namespaces: BTreeMap<String, HostNamespace>,
}

impl HostBindings {
    /// Create empty bindings.
    pub fn new() -> Self {
        Self {
            namespaces: BTreeMap::new(),
        }
    }

    /// Add or replace a namespace.
    pub fn with_namespace(mut self, name: &str, namespace: HostNamespace) -> Self {
        self.namespaces.insert(name.to_owned(), namespace);
        self
    }

    /// Find a function by import module and field name.
    ///
    /// # Errors
    /// Returns `BridgeError::UnknownFunction` when no such binding exists.
    pub fn lookup(&self, module: &str, name: &str) -> Result<HostFnKind, BridgeError> {
        self.namespaces
            .get(module)
            .and_then(|namespace| namespace.functions.get(name))
            .copied()
            .ok_or_else(|| BridgeError::UnknownFunction {
                module: module.to_owned(),
                name: name.to_owned(),
            })
    }

    /// Iterate over `(module, name, kind)` triples in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, HostFnKind)> {
        self.namespaces.iter().flat_map(|(module, namespace)| {
            namespace
                .functions
                .iter()
                .map(move |(name, kind)| (module.as_str(), name.as_str(), *kind))
        })
    }
}

impl Default for HostBindings {
    fn default() -> Self {
        Self::new()
    }
}

/// Import module used by C guests.
pub const ENV_MODULE: &str = "env";
/// Import module used by the web runtime.
pub const WEB_MODULE: &str = "web_odin";
/// Import module providing descriptor writes.
pub const STREAM_MODULE: &str = "odin_env";

/// Build the `env` namespace: the three bridge entry points as C imports.
pub fn build_env_namespace() -> HostNamespace {
    HostNamespace::new()
        .with_fn("__window_console_log", HostFnKind::CString(Severity::Info))
        .with_fn("__window_console_log_int", HostFnKind::Int)
        .with_fn("__window_console_error", HostFnKind::CString(Severity::Error))
}

/// Build the `web_odin` namespace: sized-text logging.
pub fn build_web_namespace() -> HostNamespace {
    HostNamespace::new()
        .with_fn("log_str", HostFnKind::Sized(Severity::Info))
        .with_fn("log_int", HostFnKind::Int)
}

/// Build the `odin_env` namespace: `write(fd, ptr, len)`.
pub fn build_stream_namespace() -> HostNamespace {
    HostNamespace::new().with_fn("write", HostFnKind::Write)
}

/// Build the default bindings offered to every module.
pub fn build_default_bindings() -> HostBindings {
    HostBindings::new()
        .with_namespace(ENV_MODULE, build_env_namespace())
        .with_namespace(WEB_MODULE, build_web_namespace())
        .with_namespace(STREAM_MODULE, build_stream_namespace())
}
