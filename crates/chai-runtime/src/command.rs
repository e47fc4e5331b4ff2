#![forbid(unsafe_code)]

//! Commands: deferred side effects that produce messages.
//!
//! `update` never blocks — anything slow is described as a [`Cmd`] and
//! executed by the runtime off the main loop. A task runs on its own
//! worker thread and its resulting message is fed back through the
//! queue; a batch dispatches every child concurrently, so their results
//! arrive in completion order, not submission order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::message::{CommandError, Msg};

/// A side effect to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<U> {
    /// No operation.
    #[default]
    None,
    /// End the program loop.
    Quit,
    /// Execute several commands concurrently.
    Batch(Vec<Cmd<U>>),
    /// Run a closure on a worker thread; its message is queued on
    /// completion.
    Task(Box<dyn FnOnce() -> Msg<U> + Send>),
}

impl<U> std::fmt::Debug for Cmd<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(&cmds.len()).finish(),
            Self::Task(_) => write!(f, "Task(..)"),
        }
    }
}

impl<U: Send + 'static> Cmd<U> {
    /// A no-op command.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// A command that ends the program.
    #[inline]
    #[must_use]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// A command that immediately queues `msg`.
    #[must_use]
    pub fn msg(msg: Msg<U>) -> Self {
        Self::Task(Box::new(move || msg))
    }

    /// Run `f` on a worker thread and queue the message it returns.
    #[must_use]
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> Msg<U> + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Combine commands; children execute concurrently.
    ///
    /// An empty batch collapses to [`Cmd::None`] and a singleton to its
    /// only element.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }
}

/// Execute a command, feeding produced messages into `queue`.
///
/// `Quit` is enqueued like any other message so work already queued
/// ahead of it is still observed. A panicking task becomes
/// [`Msg::Err`]; it never takes the program down.
pub(crate) fn dispatch<U: Send + 'static>(cmd: Cmd<U>, queue: &Sender<Msg<U>>) {
    match cmd {
        Cmd::None => {}
        Cmd::Quit => {
            let _ = queue.send(Msg::Quit);
        }
        Cmd::Batch(cmds) => {
            for cmd in cmds {
                dispatch(cmd, queue);
            }
        }
        Cmd::Task(f) => {
            let task_queue = queue.clone();
            let spawned = thread::Builder::new()
                .name("chai-task".into())
                .spawn(move || {
                    let msg = match catch_unwind(AssertUnwindSafe(f)) {
                        Ok(msg) => msg,
                        Err(payload) => {
                            debug!("command task panicked");
                            Msg::Err(CommandError::from_panic(&*payload))
                        }
                    };
                    let _ = task_queue.send(msg);
                });
            if spawned.is_err() {
                let _ = queue.send(Msg::Err(CommandError::new("failed to spawn task worker")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn batch_normalizes() {
        assert!(matches!(Cmd::<()>::batch(vec![]), Cmd::None));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::quit()]),
            Cmd::Quit
        ));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::none(), Cmd::quit()]),
            Cmd::Quit
        ));
        assert!(matches!(
            Cmd::<()>::batch(vec![Cmd::quit(), Cmd::msg(Msg::User(()))]),
            Cmd::Batch(_)
        ));
    }

    #[test]
    fn debug_formats() {
        assert_eq!(format!("{:?}", Cmd::<()>::none()), "None");
        assert_eq!(format!("{:?}", Cmd::<()>::task(|| Msg::Quit)), "Task(..)");
    }

    #[test]
    fn dispatch_task_delivers_message() {
        let (tx, rx) = mpsc::channel();
        dispatch(Cmd::task(|| Msg::User(7u32)), &tx);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).ok(),
            Some(Msg::User(7))
        );
    }

    #[test]
    fn dispatch_quit_enqueues_behind_existing_messages() {
        let (tx, rx) = mpsc::channel();
        tx.send(Msg::User(1u32)).expect("send");
        dispatch(Cmd::quit(), &tx);
        assert_eq!(rx.try_recv().ok(), Some(Msg::User(1)));
        assert_eq!(rx.try_recv().ok(), Some(Msg::Quit));
    }

    #[test]
    fn dispatch_batch_delivers_all_in_completion_order() {
        let (tx, rx) = mpsc::channel();
        let slow = Cmd::task(|| {
            std::thread::sleep(Duration::from_millis(80));
            Msg::User("slow")
        });
        let fast = Cmd::task(|| Msg::User("fast"));
        dispatch(Cmd::batch(vec![slow, fast]), &tx);

        let first = rx.recv_timeout(Duration::from_secs(5)).expect("first");
        let second = rx.recv_timeout(Duration::from_secs(5)).expect("second");
        assert_eq!(first, Msg::User("fast"));
        assert_eq!(second, Msg::User("slow"));
    }

    #[test]
    fn panicking_task_becomes_err_message() {
        let (tx, rx) = mpsc::channel::<Msg<()>>();
        dispatch(Cmd::task(|| panic!("disk on fire")), &tx);
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(Msg::Err(err)) => assert_eq!(err.message(), "disk on fire"),
            other => panic!("expected Err message, got {other:?}"),
        }
    }
}
