#![forbid(unsafe_code)]

//! The model protocol.

use crate::command::Cmd;
use crate::message::Msg;

/// An application (or a widget inside one).
///
/// A model is a value plus three functions: `init` for startup effects,
/// `update` for state transitions, and `view` for projection to a frame
/// string. The runtime holds the model exclusively — exactly one
/// `update` runs at a time, and nothing else observes the model while it
/// does.
///
/// Widgets are models too: a parent embeds them as fields, forwards the
/// relevant messages from its own `update`, and splices their `view()`
/// output into its frame. Composition is explicit delegation, not a
/// widget tree.
pub trait Model {
    /// Payload type carried by [`Msg::User`] for this application.
    type Custom: Send + 'static;

    /// Called once before the first message. Returns a command for
    /// startup side effects.
    fn init(&mut self) -> Cmd<Self::Custom> {
        Cmd::None
    }

    /// Handle one message, returning a command for any follow-up side
    /// effect. Must not block; offload slow work with
    /// [`Cmd::task`](crate::Cmd::task).
    fn update(&mut self, msg: Msg<Self::Custom>) -> Cmd<Self::Custom>;

    /// Render the current state as a frame: lines separated by `\n`.
    fn view(&self) -> String;
}
