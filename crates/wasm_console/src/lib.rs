//! Run a WebAssembly module with its console output routed to the host log.

use anyhow::{Context as _, Result, anyhow};
use bridge_wasmtime::WasmHost;
use console_bridge::{BridgeConfig, ConsoleHandle, ModuleHost as _};
use log::info;
use std::fs;
use std::path::Path;

/// Entry point used when none is given.
pub const DEFAULT_ENTRY: &str = "_start";

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunArgs {
    /// Path to a `.wasm` or `.wat` file.
    pub module_path: String,
    /// Exported function to call.
    pub entry: String,
}

impl RunArgs {
    /// Parse `<module> [entry]` from the arguments after the program name.
    ///
    /// # Errors
    /// Returns an error if the module path is missing or extra arguments are given.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut iter = args.into_iter();
        let module_path = iter
            .next()
            .ok_or_else(|| anyhow!("usage: wasm_console <module.wasm|module.wat> [entry]"))?;
        let entry = iter.next().unwrap_or_else(|| DEFAULT_ENTRY.to_owned());
        if let Some(extra) = iter.next() {
            return Err(anyhow!("unexpected argument {extra}"));
        }
        Ok(Self { module_path, entry })
    }
}

/// Load the module at `args.module_path` and run `args.entry` against `handle`.
///
/// Entries taking a single parameter receive the console window pointer;
/// entries without parameters are called directly. Partial lines are flushed
/// before returning, whether or not the module trapped.
///
/// # Errors
/// Returns an error if the file cannot be read, the module fails to load or
/// the entry point traps.
pub fn run(args: &RunArgs, handle: ConsoleHandle, config: &BridgeConfig) -> Result<()> {
    let path = Path::new(&args.module_path);
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_stem()
        .map_or_else(|| args.module_path.clone(), |stem| stem.to_string_lossy().into_owned());

    let mut host = WasmHost::new(handle, config)?;
    host.load(&bytes, &name)?;
    let result = match host.entry_param_count(&args.entry)? {
        0 => host.run_entry(&args.entry),
        1 => host.run_entry_with_console(&args.entry),
        count => Err(anyhow!(
            "entry {} takes {count} parameters; expected none or a window pointer",
            args.entry
        )),
    };
    host.flush();
    if result.is_ok() {
        info!("module {name} finished");
    }
    result
}
