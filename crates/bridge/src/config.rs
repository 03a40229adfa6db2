//! Host configuration for the console bridge.
//!
//! Settings can be constructed programmatically or read from environment
//! variables. Nothing here is visible to module code.

use crate::console::DEFAULT_LABEL;
use crate::layout::MIN_TABLE_SIZE;
use std::env;

/// Default initial size of host-provided linear memory, in 64 KiB pages.
pub const DEFAULT_MEMORY_INITIAL_PAGES: u32 = 100;
/// Default maximum size of host-provided linear memory, in 64 KiB pages.
pub const DEFAULT_MEMORY_MAX_PAGES: u32 = 1000;
/// Default maximum size of the host-provided indirect function table.
pub const DEFAULT_TABLE_MAX: u32 = 10;

/// Runtime configuration for a bridge host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Initial pages of the memory exported to modules as `env.memory`.
    pub memory_initial_pages: u32,
    /// Maximum pages of that memory (never below the initial size).
    pub memory_max_pages: u32,
    /// Initial size of `env.__indirect_function_table`.
    pub table_size: u32,
    /// Prefix printed before every module line.
    pub label: String,
}

impl BridgeConfig {
    /// Construct a configuration, clamping values to usable minimums.
    ///
    /// # Arguments
    ///
    /// * `memory_initial_pages` - Initial memory pages (minimum 1)
    /// * `memory_max_pages` - Maximum memory pages (at least the initial size)
    /// * `table_size` - Indirect table size (at least enough for both console slots)
    /// * `label` - Prefix for module output
    #[inline]
    #[must_use]
    pub fn new<L: Into<String>>(
        memory_initial_pages: u32,
        memory_max_pages: u32,
        table_size: u32,
        label: L,
    ) -> Self {
        let initial = memory_initial_pages.max(1);
        Self {
            memory_initial_pages: initial,
            memory_max_pages: memory_max_pages.max(initial),
            table_size: table_size.max(MIN_TABLE_SIZE),
            label: label.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `CONSOLE_BRIDGE_MEMORY_INITIAL_PAGES` (default: 100)
    /// - `CONSOLE_BRIDGE_MEMORY_MAX_PAGES` (default: 1000)
    /// - `CONSOLE_BRIDGE_TABLE_SIZE` (default: 3)
    /// - `CONSOLE_BRIDGE_LABEL` (default: `WASM`)
    ///
    /// Unparseable values fall back to the defaults.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let read_u32 = |name: &str, default: u32| {
            env::var(name)
                .ok()
                .and_then(|val| val.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };
        let label = env::var("CONSOLE_BRIDGE_LABEL")
            .ok()
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_LABEL.to_owned());
        Self::new(
            read_u32(
                "CONSOLE_BRIDGE_MEMORY_INITIAL_PAGES",
                DEFAULT_MEMORY_INITIAL_PAGES,
            ),
            read_u32("CONSOLE_BRIDGE_MEMORY_MAX_PAGES", DEFAULT_MEMORY_MAX_PAGES),
            read_u32("CONSOLE_BRIDGE_TABLE_SIZE", MIN_TABLE_SIZE),
            label,
        )
    }

    /// Maximum size of the host-provided table (never below `table_size`).
    #[inline]
    pub fn table_max(&self) -> u32 {
        DEFAULT_TABLE_MAX.max(self.table_size)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MEMORY_INITIAL_PAGES,
            DEFAULT_MEMORY_MAX_PAGES,
            MIN_TABLE_SIZE,
            DEFAULT_LABEL,
        )
    }
}
