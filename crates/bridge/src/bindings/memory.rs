//! Decoding of text passed by guest pointer.
//!
//! Guests hand the host raw offsets into their linear memory. The host copies
//! the bytes out during the call, so nothing here borrows past the call
//! boundary. Offsets that fall outside memory decode as empty text.

use log::warn;

/// Read a NUL-terminated string starting at `ptr`.
///
/// Stops at the first zero byte or at the end of memory, whichever comes
/// first. Invalid UTF-8 is replaced rather than rejected.
pub fn read_c_string(memory: &[u8], ptr: u32) -> String {
    let start = ptr as usize;
    let Some(tail) = memory.get(start..) else {
        warn!("guest string pointer {ptr:#x} is outside memory ({} bytes)", memory.len());
        return String::new();
    };
    let end = tail.iter().position(|byte| *byte == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}

/// Borrow `len` bytes starting at `ptr`.
///
/// The range is clamped to the memory bounds.
pub fn read_bytes(memory: &[u8], ptr: u32, len: u32) -> &[u8] {
    let start = ptr as usize;
    if start > memory.len() {
        warn!("guest string pointer {ptr:#x} is outside memory ({} bytes)", memory.len());
        return &[];
    }
    let end = start.saturating_add(len as usize);
    if end > memory.len() {
        warn!(
            "guest string {ptr:#x}+{len} runs past memory ({} bytes); truncating",
            memory.len()
        );
    }
    &memory[start..end.min(memory.len())]
}

/// Read `len` bytes starting at `ptr` as a string.
///
/// The range is clamped to the memory bounds.
pub fn read_string(memory: &[u8], ptr: u32, len: u32) -> String {
    String::from_utf8_lossy(read_bytes(memory, ptr, len)).into_owned()
}
