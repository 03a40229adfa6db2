//! Wasmtime-backed module host.

use crate::bindings::install_bindings_impl;
use anyhow::{Result, anyhow};
use console_bridge::bindings::ENV_MODULE;
use console_bridge::layout::{ERROR_TRAMPOLINE, LOG_TRAMPOLINE};
use console_bridge::{
    BridgeConfig, ConsoleHandle, ConsoleLayout, HostBindings, HostContext, LogConsole, ModuleHost,
    build_default_bindings,
};
use log::{debug, warn};
use wasmtime::{
    Engine, Extern, Func, Instance, Linker, Memory, MemoryType, Module, Ref, RefType, Store, Table,
    TableType, Val,
};

/// Import module some toolchains use for host memory.
const JS_MODULE: &str = "js";
/// Import/export name of the indirect function table.
const TABLE_NAME: &str = "__indirect_function_table";

/// A wasmtime engine, linker and store wired to one console handle.
pub struct WasmHost {
    /// Compilation engine shared by every module loaded here.
    engine: Engine,
    /// Linker holding the console bindings and host memory/table.
    linker: Linker<HostContext>,
    /// Store whose data is the per-module `HostContext`.
    store: Store<HostContext>,
    /// Memory offered as `env.memory` / `js.memory`.
    host_memory: Memory,
    /// Table offered as `env.__indirect_function_table`.
    host_table: Table,
    /// Currently loaded instance, if any.
    instance: Option<Instance>,
    /// Where load failures and traps are reported.
    diagnostics: LogConsole,
}

impl WasmHost {
    /// Create a host with the default bindings installed.
    ///
    /// # Errors
    /// Returns an error if the host memory or table cannot be created.
    pub fn new(handle: ConsoleHandle, config: &BridgeConfig) -> Result<Self> {
        let mut host = Self::bare(handle, config)?;
        host.install_bindings(&build_default_bindings())?;
        Ok(host)
    }

    /// Create a host with host memory and table but no functions installed.
    ///
    /// # Errors
    /// Returns an error if the host memory or table cannot be created.
    pub fn bare(handle: ConsoleHandle, config: &BridgeConfig) -> Result<Self> {
        let engine = Engine::default();
        let mut store = Store::new(&engine, HostContext::new(handle));
        let host_memory = Memory::new(
            &mut store,
            MemoryType::new(config.memory_initial_pages, Some(config.memory_max_pages)),
        )?;
        let host_table = Table::new(
            &mut store,
            TableType::new(
                RefType::FUNCREF,
                config.table_size,
                Some(config.table_max()),
            ),
            Ref::Func(None),
        )?;
        let mut linker = Linker::new(&engine);
        linker.define(&store, ENV_MODULE, "memory", host_memory)?;
        linker.define(&store, JS_MODULE, "memory", host_memory)?;
        linker.define(&store, ENV_MODULE, TABLE_NAME, host_table)?;
        debug!(
            "WasmHost initialized ({} pages, table size {})",
            config.memory_initial_pages, config.table_size
        );
        Ok(Self {
            engine,
            linker,
            store,
            host_memory,
            host_table,
            instance: None,
            diagnostics: LogConsole::new(config.label.clone()),
        })
    }

    /// Register host functions described by `bindings`.
    ///
    /// # Errors
    /// Returns an error if a function is already defined.
    pub fn install_bindings(&mut self, bindings: &HostBindings) -> Result<()> {
        install_bindings_impl(&self.engine, &mut self.linker, self.host_memory, bindings)
    }

    /// Console handle modules write to.
    pub fn handle(&self) -> &ConsoleHandle {
        &self.store.data().handle
    }

    /// Name given to the last loaded module.
    pub fn module_name(&self) -> Option<&str> {
        self.store.data().module_name.as_deref()
    }

    fn instance(&self) -> Result<Instance> {
        self.instance.ok_or_else(|| anyhow!("no module loaded"))
    }

    /// Number of parameters the exported function `entry` takes.
    ///
    /// # Errors
    /// Returns an error if no module is loaded or `entry` is not an exported function.
    pub fn entry_param_count(&mut self, entry: &str) -> Result<usize> {
        let instance = self.instance()?;
        let func = self.exported_func(instance, entry)?;
        Ok(func.ty(&self.store).params().len())
    }

    /// Memory the loaded module addresses: its own export, else the host's.
    fn guest_memory(&mut self, instance: Instance) -> Memory {
        instance
            .get_export(&mut self.store, "memory")
            .and_then(Extern::into_memory)
            .unwrap_or(self.host_memory)
    }

    /// Table the loaded module calls through: its own export, else the host's.
    fn guest_table(&mut self, instance: Instance) -> Table {
        instance
            .get_table(&mut self.store, TABLE_NAME)
            .unwrap_or(self.host_table)
    }

    /// Write the console structs and fill the trampoline slots.
    fn install_console_layout(&mut self, instance: Instance, layout: &ConsoleLayout) -> Result<()> {
        let memory = self.guest_memory(instance);
        for (address, word) in layout.encode() {
            memory.write(&mut self.store, address as usize, &word)?;
        }
        let table = self.guest_table(instance);
        let needed = layout.log_slot.max(layout.error_slot).saturating_add(1);
        let size = table.size(&self.store);
        if needed > size {
            debug!("growing module table from {size} to {needed} entries");
            table.grow(&mut self.store, needed - size, Ref::Func(None))?;
        }
        for (slot, export) in [
            (layout.log_slot, LOG_TRAMPOLINE),
            (layout.error_slot, ERROR_TRAMPOLINE),
        ] {
            match instance.get_func(&mut self.store, export) {
                Some(func) => table.set(&mut self.store, slot, Ref::Func(Some(func)))?,
                None => warn!("module does not export {export}; console slot {slot} left empty"),
            }
        }
        Ok(())
    }

    fn report_failure(&self, error: &anyhow::Error) {
        self.diagnostics.exception(format!("{error}"), Some(&format!("{error:?}")));
    }

    /// Call `func`, discarding whatever it returns.
    fn call_entry(&mut self, func: Func, params: &[Val]) -> Result<()> {
        let mut results = vec![Val::I32(0); func.ty(&self.store).results().len()];
        func.call(&mut self.store, params, &mut results)
            .inspect_err(|error| self.report_failure(error))
    }

    fn exported_func(&mut self, instance: Instance, entry: &str) -> Result<Func> {
        instance
            .get_func(&mut self.store, entry)
            .ok_or_else(|| anyhow!("module does not export function {entry}"))
    }
}

impl ModuleHost for WasmHost {
    fn load(&mut self, bytes: &[u8], name: &str) -> Result<()> {
        let module =
            Module::new(&self.engine, bytes).inspect_err(|error| self.report_failure(error))?;
        let instance = self
            .linker
            .instantiate(&mut self.store, &module)
            .inspect_err(|error| self.report_failure(error))?;
        self.store.data_mut().module_name = Some(name.to_owned());
        self.instance = Some(instance);
        debug!("loaded module {name}");
        Ok(())
    }

    fn run_entry(&mut self, entry: &str) -> Result<()> {
        let instance = self.instance()?;
        let func = self.exported_func(instance, entry)?;
        self.call_entry(func, &[])
    }

    fn run_entry_with_console(&mut self, entry: &str) -> Result<()> {
        let instance = self.instance()?;
        let layout = ConsoleLayout::standard();
        self.install_console_layout(instance, &layout)?;
        let func = self.exported_func(instance, entry)?;
        self.call_entry(func, &[Val::I32(layout.window_ptr as i32)])
    }

    fn flush(&mut self) {
        self.store.data_mut().flush();
    }
}

impl Drop for WasmHost {
    fn drop(&mut self) {
        self.flush();
    }
}
