//! Global log stream instances.
//!
//! One stream per producer side so interrupt messages are never starved by
//! main-loop chatter.

use crate::logging::LogStream;

/// Log stream for the sample-tick and button interrupts.
pub static ISR_LOG_STREAM: LogStream = LogStream::new();

/// Log stream for the main loop.
pub static MAIN_LOG_STREAM: LogStream = LogStream::new();
