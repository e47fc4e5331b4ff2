#![forbid(unsafe_code)]

//! Elm-style program runtime.
//!
//! An application is a [`Model`]: a value with an `init` command, a pure
//! `update(msg) -> cmd` transition, and a `view() -> String` projection.
//! The [`Program`] owns the terminal and drives the loop: decoded key
//! presses and resize notifications arrive as [`Msg`] values on a
//! channel, each one flows through `update`, commands run on worker
//! threads and feed their results back into the same channel, and after
//! every update the new `view()` is handed to the line-diff renderer.
//!
//! ```no_run
//! use chai_runtime::{Cmd, Model, Msg, Program};
//!
//! struct Counter {
//!     count: i64,
//! }
//!
//! impl Model for Counter {
//!     type Custom = ();
//!
//!     fn update(&mut self, msg: Msg<()>) -> Cmd<()> {
//!         match msg {
//!             Msg::Key(key) if key.is_char('q') => Cmd::quit(),
//!             Msg::Key(key) if key.is_char('+') => {
//!                 self.count += 1;
//!                 Cmd::none()
//!             }
//!             _ => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Count: {}", self.count)
//!     }
//! }
//!
//! fn main() -> Result<(), chai_runtime::ProgramError> {
//!     let final_model = Program::new(Counter { count: 0 }).run()?;
//!     println!("final count: {}", final_model.count);
//!     Ok(())
//! }
//! ```

pub mod command;
mod input;
pub mod message;
pub mod model;
pub mod program;

pub use command::Cmd;
pub use message::{CommandError, Msg};
pub use model::Model;
pub use program::{Program, ProgramConfig, ProgramError};
