//! Line buffer for terminal input

use crate::config::LINE_BUFFER_SIZE;

/// Payload bytes that fit next to the terminator.
pub const LINE_CAPACITY: usize = LINE_BUFFER_SIZE - 1;

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Byte stored (or silently dropped past capacity)
    Stored,
    /// Last byte removed
    Erased,
    /// CR or LF: line complete
    Complete,
    /// Control byte without meaning
    Ignored,
}

/// Line input buffer
///
/// Input longer than [`LINE_CAPACITY`] is truncated, never rejected.
pub struct LineBuffer {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    /// Push a character, returns `false` if it was dropped
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < LINE_CAPACITY {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Handle one received byte
    pub fn feed(&mut self, byte: u8) -> Feed {
        match byte {
            b'\r' | b'\n' => Feed::Complete,
            0x7F | 0x08 => {
                self.backspace();
                Feed::Erased
            }
            0x20..=0x7E => {
                self.push(byte);
                Feed::Stored
            }
            _ => Feed::Ignored,
        }
    }

    /// Remove last character
    pub fn backspace(&mut self) {
        if self.len > 0 {
            self.len -= 1;
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once further bytes would be dropped
    pub fn is_full(&self) -> bool {
        self.len == LINE_CAPACITY
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
