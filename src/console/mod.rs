//! Operator terminal menu
//!
//! Polled from the main loop, never blocks.
//! Zero heap allocation - the pending line is a fixed buffer.

pub mod line_buffer;
pub mod menu;
pub mod parser;

pub use line_buffer::{Feed, LineBuffer, LINE_CAPACITY};
pub use menu::{Menu, VERSION};
pub use parser::{parse_number, ConfirmToken};
