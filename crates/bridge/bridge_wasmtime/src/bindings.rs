//! Installation of `HostBindings` into a wasmtime `Linker`.

use anyhow::Result;
use console_bridge::{HostBindings, HostContext, HostFnKind};
use core::iter;
use wasmtime::{Caller, Engine, Extern, FuncType, Linker, Memory, Val, ValType};

/// Register every function of `bindings` on `linker`.
///
/// Each callback decodes its `i32` arguments against the calling module's
/// exported memory, or `fallback_memory` when the module imports memory from
/// the host instead. Plumbing errors become traps; output never fails.
///
/// # Errors
/// Returns an error if a function with the same name was already defined.
pub(crate) fn install_bindings_impl(
    engine: &Engine,
    linker: &mut Linker<HostContext>,
    fallback_memory: Memory,
    bindings: &HostBindings,
) -> Result<()> {
    for (module, name, kind) in bindings.iter() {
        let ty = FuncType::new(engine, iter::repeat_n(ValType::I32, kind.arity()), []);
        let import_name = name.to_owned();
        linker.func_new(
            module,
            name,
            ty,
            move |mut caller: Caller<'_, HostContext>, params: &[Val], _results: &mut [Val]| {
                dispatch(&mut caller, fallback_memory, kind, &import_name, params)
            },
        )?;
    }
    Ok(())
}

/// Resolve the memory a call's pointers refer to.
fn guest_memory(caller: &mut Caller<'_, HostContext>, fallback: Memory) -> Memory {
    caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .unwrap_or(fallback)
}

/// Decode raw wasm values and hand them to the bridge.
fn dispatch(
    caller: &mut Caller<'_, HostContext>,
    fallback_memory: Memory,
    kind: HostFnKind,
    name: &str,
    params: &[Val],
) -> Result<()> {
    let args: Vec<i32> = params.iter().filter_map(Val::i32).collect();
    let memory = guest_memory(caller, fallback_memory);
    let (bytes, context) = memory.data_and_store_mut(caller);
    kind.invoke(name, context, bytes, &args)?;
    Ok(())
}
