//! In-memory shape of the guest-visible `Window`/`Console` structs.
//!
//! Guests written against the C header see the console as
//!
//! ```c
//! typedef struct Console { LogFunc log; ErrorFunc error; } Console;
//! typedef struct Window { Console* console; } Window;
//! ```
//!
//! where both function slots are indices into the module's indirect function
//! table. The host writes these structs into low memory before calling an
//! entry point with the window pointer.

/// Size of a guest pointer or table index, in bytes.
pub const PTR_SIZE: u32 = 4;
/// Table slot holding the guest's log trampoline.
pub const CONSOLE_LOG_SLOT: u32 = 1;
/// Table slot holding the guest's error trampoline.
pub const CONSOLE_ERROR_SLOT: u32 = 2;
/// Smallest indirect table able to hold both slots.
pub const MIN_TABLE_SIZE: u32 = CONSOLE_ERROR_SLOT + 1;
/// Guest export installed into the log slot.
pub const LOG_TRAMPOLINE: &str = "__IMPL_window_console_log";
/// Guest export installed into the error slot.
pub const ERROR_TRAMPOLINE: &str = "__IMPL_window_console_error";

/// Byte offsets of the console structs in guest memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConsoleLayout {
    /// Address of the `Window` struct (passed to the entry point).
    pub window_ptr: u32,
    /// Address of the `Console` struct.
    pub console_ptr: u32,
    /// Table index stored in `Console::log`.
    pub log_slot: u32,
    /// Table index stored in `Console::error`.
    pub error_slot: u32,
}

impl ConsoleLayout {
    /// Layout the stock loader writes: a zero word at address 0, the
    /// window at word 1 and the console at word 2.
    pub const fn standard() -> Self {
        Self {
            window_ptr: PTR_SIZE,
            console_ptr: 2 * PTR_SIZE,
            log_slot: CONSOLE_LOG_SLOT,
            error_slot: CONSOLE_ERROR_SLOT,
        }
    }

    /// One past the last byte written by `encode`.
    pub const fn end(&self) -> u32 {
        self.console_ptr + 2 * PTR_SIZE
    }

    /// Little-endian words to write, as `(address, bytes)` pairs.
    pub fn encode(&self) -> Vec<(u32, [u8; 4])> {
        vec![
            (0, 0_u32.to_le_bytes()),
            (self.window_ptr, self.console_ptr.to_le_bytes()),
            (self.console_ptr, self.log_slot.to_le_bytes()),
            (self.console_ptr + PTR_SIZE, self.error_slot.to_le_bytes()),
        ]
    }
}

impl Default for ConsoleLayout {
    fn default() -> Self {
        Self::standard()
    }
}
