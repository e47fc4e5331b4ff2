#![forbid(unsafe_code)]

//! The message taxonomy.
//!
//! A message is the only thing that can change a model. The built-in
//! kinds are closed — keys, resizes, quit, command failures — and
//! `User` carries whatever payload type the application defines for its
//! own commands.

use std::fmt;

use chai_core::event::KeyEvent;

/// A message delivered to [`Model::update`](crate::Model::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<U> {
    /// A key press.
    Key(KeyEvent),

    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Ends the program loop. Consumed by the runtime; never delivered
    /// to the model.
    Quit,

    /// A command panicked. Delivered to the model so the application can
    /// surface the failure; never terminates the program.
    Err(CommandError),

    /// Application-defined payload, produced by commands.
    User(U),
}

/// The captured failure of a command task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    /// Wrap a failure description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extract a readable message from a panic payload.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "command panicked".to_string()
        };
        Self { message }
    }

    /// The failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command failed: {}", self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chai_core::event::{KeyCode, KeyEvent};

    #[test]
    fn messages_compare() {
        let a: Msg<i32> = Msg::Key(KeyEvent::new(KeyCode::Enter));
        let b: Msg<i32> = Msg::Key(KeyEvent::new(KeyCode::Enter));
        assert_eq!(a, b);
        assert_ne!(a, Msg::Quit);
        assert_eq!(Msg::User(7), Msg::<i32>::User(7));
    }

    #[test]
    fn command_error_from_panic_payloads() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(CommandError::from_panic(&*boxed).message(), "boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom".to_string());
        assert_eq!(CommandError::from_panic(&*boxed).message(), "boom");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(
            CommandError::from_panic(&*boxed).message(),
            "command panicked"
        );
    }

    #[test]
    fn command_error_display() {
        let err = CommandError::new("no route");
        assert_eq!(err.to_string(), "command failed: no route");
    }
}
