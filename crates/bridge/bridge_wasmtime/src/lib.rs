//! WebAssembly module host using the wasmtime backend.
//!
//! This crate provides a wasmtime-backed implementation of the `ModuleHost`
//! trait. It installs the console bridge imports, offers host memory and an
//! indirect function table to modules that import them, and runs entry
//! points.

mod bindings;
mod engine;

pub use engine::WasmHost;
