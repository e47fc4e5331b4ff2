#![forbid(unsafe_code)]

//! chai public facade.
//!
//! # Role
//! This crate is the user-facing entry point: it re-exports the commonly
//! used types from the internal crates so application code does not need
//! to wire each one individually.
//!
//! - Input parsing and terminal lifecycle: `chai-core`
//! - String measurement and wrapping: `chai-text`
//! - Styling and borders: `chai-style`
//! - Block composition: `chai-layout`
//! - Frame presentation: `chai-render`
//! - The program loop: `chai-runtime`
//!
//! If you depend on one crate in your application, it should be `chai`.
//!
//! # Example
//!
//! ```no_run
//! use chai::prelude::*;
//!
//! struct Hello {
//!     presses: u32,
//! }
//!
//! impl Model for Hello {
//!     type Custom = ();
//!
//!     fn update(&mut self, msg: Msg<()>) -> Cmd<()> {
//!         match msg {
//!             Msg::Key(key) if key.is_char('q') => Cmd::quit(),
//!             Msg::Key(_) => {
//!                 self.presses += 1;
//!                 Cmd::none()
//!             }
//!             _ => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self) -> String {
//!         Style::new()
//!             .border(Border::ROUNDED)
//!             .padding((0, 1))
//!             .render(&format!("{} key presses — q quits", self.presses))
//!     }
//! }
//!
//! fn main() -> Result<(), ProgramError> {
//!     Program::new(Hello { presses: 0 }).run()?;
//!     Ok(())
//! }
//! ```

// --- Core re-exports -------------------------------------------------------

pub use chai_core::event::{Event, KeyCode, KeyEvent, Modifiers};
pub use chai_core::input_parser::InputParser;
#[cfg(unix)]
pub use chai_core::resize::ResizeWatcher;
pub use chai_core::session::{SessionOptions, TerminalSession};

// --- Text re-exports -------------------------------------------------------

pub use chai_text::{pad_right, strip_ansi, truncate, visible_width, word_wrap};

// --- Style re-exports ------------------------------------------------------

pub use chai_style::{Border, Edges, Rgb, Sides, Style};

// --- Layout re-exports -----------------------------------------------------

pub use chai_layout::{join_horizontal, join_vertical, place};

// --- Render re-exports -----------------------------------------------------

pub use chai_render::Renderer;

// --- Runtime re-exports ----------------------------------------------------

pub use chai_runtime::{Cmd, CommandError, Model, Msg, Program, ProgramConfig, ProgramError};

/// Standard result type for chai applications.
pub type Result<T> = std::result::Result<T, ProgramError>;

// --- Prelude ---------------------------------------------------------------

/// The types almost every application needs.
pub mod prelude {
    pub use crate::{
        Border, Cmd, Event, KeyCode, KeyEvent, Model, Modifiers, Msg, Program, ProgramConfig,
        ProgramError, Rgb, Style,
    };
}

pub use chai_core as core;
pub use chai_layout as layout;
pub use chai_render as render;
pub use chai_runtime as runtime;
pub use chai_style as style;
pub use chai_text as text;
