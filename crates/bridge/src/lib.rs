//! Host console bridge for sandboxed WebAssembly modules.
//!
//! Modules cannot perform output themselves. They import a handful of host
//! functions that forward text and integers to the host console at one of two
//! severities. This crate holds everything that does not depend on a
//! particular WebAssembly runtime: the console surfaces, the handle exposing
//! the entry points, the import table and guest-memory decoding.

use anyhow::Result;

pub mod console;
pub use console::{ConsoleRecord, LogConsole, RecordingConsole};

/// Engine-agnostic host bindings: values, console trait and import table.
pub mod bindings;
pub use bindings::{
    BridgeError, HostBindings, HostConsole, HostContext, HostFnKind, HostNamespace, Message,
    Severity, build_default_bindings, build_env_namespace, build_stream_namespace,
    build_web_namespace,
};

pub mod config;
pub use config::BridgeConfig;

mod handle;
pub use handle::ConsoleHandle;

pub mod layout;
pub use layout::ConsoleLayout;

pub mod stream;
pub use stream::StreamWriter;

/// A minimal interface for running a module against the bridge.
/// Keep this trait small so runtimes can be swapped.
pub trait ModuleHost {
    /// Compile and instantiate a module from binary or text form.
    fn load(&mut self, bytes: &[u8], name: &str) -> Result<()>;
    /// Call an exported entry point that takes no arguments.
    fn run_entry(&mut self, entry: &str) -> Result<()>;
    /// Write the console structs into guest memory and call `entry(window_ptr)`.
    fn run_entry_with_console(&mut self, entry: &str) -> Result<()>;
    /// Emit any partial lines still buffered for the module.
    fn flush(&mut self);
}
