#![forbid(unsafe_code)]

//! Core: terminal lifecycle, input byte parsing, and event types.

pub mod event;
pub mod input_parser;
#[cfg(unix)]
pub mod resize;
pub mod session;

pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use input_parser::InputParser;
#[cfg(unix)]
pub use resize::ResizeWatcher;
pub use session::{SessionOptions, TerminalSession};
