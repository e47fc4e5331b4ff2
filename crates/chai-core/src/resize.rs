#![forbid(unsafe_code)]

//! Window-change signal watcher.
//!
//! A dedicated thread subscribes to `SIGWINCH` and re-queries the
//! terminal size on each delivery, invoking the supplied callback with
//! `(columns, rows)`. When a re-query fails, the most recent successful
//! measurement is delivered instead, so consumers always see a usable
//! size.
//!
//! `SIGINT`/`SIGTERM` are watched on the same iterator: raw mode keeps
//! Ctrl-C out of the signal path, but an external `kill` must still
//! restore the terminal before the process dies.

use std::io;
use std::thread;

use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
use signal_hook::iterator::Signals;
use tracing::{debug, warn};

use crate::session::best_effort_restore;

/// Handle to the signal watcher thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct ResizeWatcher {
    handle: signal_hook::iterator::Handle,
    thread: Option<thread::JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Spawn the watcher. `callback` receives `(columns, rows)` after
    /// every window-change signal.
    pub fn spawn<F>(callback: F) -> io::Result<Self>
    where
        F: Fn(u16, u16) + Send + 'static,
    {
        let mut signals =
            Signals::new([SIGWINCH, SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("chai-signals".into())
            .spawn(move || {
                let mut last_good: Option<(u16, u16)> = None;
                for signal in signals.forever() {
                    match signal {
                        SIGWINCH => match crossterm::terminal::size() {
                            Ok((w, h)) => {
                                debug!(width = w, height = h, "window size changed");
                                last_good = Some((w, h));
                                callback(w, h);
                            }
                            // Coalesce to the last successful query.
                            Err(_) => {
                                if let Some((w, h)) = last_good {
                                    callback(w, h);
                                }
                            }
                        },
                        SIGINT | SIGTERM => {
                            warn!(signal, "termination signal received, restoring terminal");
                            best_effort_restore();
                            std::process::exit(128 + signal);
                        }
                        _ => {}
                    }
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
