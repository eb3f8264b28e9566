//! Interrupt-safe logging for SweepSynth.
//!
//! # Architecture
//!
//! ```text
//! tick / button ISR        LogStream            main loop
//! ─────────────────        ─────────            ─────────
//!
//! rt_log!() ──────────▶ [L0][L1][L2] ──────▶ log UART TX
//! fixed stack buffer      bounded queue        blocking ok
//! non-blocking            critical section
//! ```
//!
//! # Rules
//!
//! - Interrupt handlers never write to a UART; they use `rt_log!()`
//! - A push never blocks and never allocates; when full the message is
//!   dropped and counted
//! - Only the main loop drains

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 64;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    /// Build an entry, truncating `msg` to [`MAX_MSG_LEN`].
    pub fn new(timestamp_us: i64, level: LogLevel, msg: &[u8]) -> Self {
        let len = msg.len().min(MAX_MSG_LEN);
        let mut buf = [0u8; MAX_MSG_LEN];
        buf[..len].copy_from_slice(&msg[..len]);
        Self {
            timestamp_us,
            level,
            len: len as u8,
            msg: buf,
        }
    }

    /// Message text, `"<invalid utf8>"` if a cut landed inside a character.
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::new(0, LogLevel::Info, &[])
    }
}

/// Bounded log queue shared by both interrupts and the main loop.
///
/// Push and drain each take a short critical section, so producers in
/// different interrupt levels never interleave inside one entry.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: Mutex<RefCell<Deque<LogEntry, N>>>,
    dropped: AtomicU32,
}

impl<const N: usize> LogStream<N> {
    /// Create a new empty log stream.
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if dropped (queue full).
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        let entry = LogEntry::new(timestamp_us, level, msg);
        let queued = critical_section::with(|cs| {
            self.entries.borrow_ref_mut(cs).push_back(entry).is_ok()
        });
        if !queued {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        queued
    }

    /// Drain next log entry (main loop only).
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        critical_section::with(|cs| self.entries.borrow_ref_mut(cs).pop_front())
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() > 0
    }

    /// Get number of entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| self.entries.borrow_ref(cs).len())
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written. Output past the end of `buf` is cut.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Truncating `core::fmt::Write` over a byte slice.
pub(crate) struct BufWriter<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Interrupt-safe log macro.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Info, ISR_LOG_STREAM, now_us, "sweep done after {} ticks", n);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Interrupt-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Interrupt-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Interrupt-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Interrupt-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// Interrupt-safe trace log (maximum verbosity).
#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"sweep armed"));
        assert!(stream.has_entries());
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.text(), "sweep armed");

        assert!(!stream.has_entries());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        assert!(stream.push(1, LogLevel::Info, b"1"));
        assert!(stream.push(2, LogLevel::Info, b"2"));
        assert!(stream.push(3, LogLevel::Info, b"3"));
        assert!(stream.push(4, LogLevel::Info, b"4"));

        // Should drop
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        // Drain one, should be able to push again
        assert_eq!(stream.drain().unwrap().text(), "1");
        assert!(stream.push(6, LogLevel::Info, b"6"));
    }

    #[test]
    fn test_long_message_truncated() {
        let stream = LogStream::<2>::new();
        let long = [b'x'; MAX_MSG_LEN + 10];
        stream.push(0, LogLevel::Warn, &long);
        assert_eq!(stream.drain().unwrap().len as usize, MAX_MSG_LEN);
    }

    #[test]
    fn test_format_to_buffer() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("F0={} Hz", 1000));
        assert_eq!(&buf[..len], b"F0=1000 Hz");
    }

    #[test]
    fn test_format_to_buffer_cuts() {
        let mut buf = [0u8; 4];
        let len = format_to_buffer(&mut buf, format_args!("{}", 123456));
        assert_eq!(&buf[..len], b"1234");
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_rt_macros_push() {
        let stream = LogStream::<8>::new();
        crate::rt_info!(stream, 7, "tick {}", 3);
        crate::rt_error!(stream, 8, "fault");
        assert_eq!(stream.drain().unwrap().text(), "tick 3");
        assert_eq!(stream.drain().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_concurrent_producers() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let mut handles = vec![];

        for i in 0..4 {
            let stream = Arc::clone(&stream);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    let msg = format!("producer {} msg {}", i, j);
                    stream.push(j as i64, LogLevel::Info, msg.as_bytes());
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut count = 0;
        while stream.drain().is_some() {
            count += 1;
        }
        assert_eq!(count, 40, "All messages should be present");
    }
}
