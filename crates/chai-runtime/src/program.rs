#![forbid(unsafe_code)]

//! The program: terminal lifecycle plus the update/view/render loop.

use std::io::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

#[cfg(unix)]
use chai_core::resize::ResizeWatcher;
use chai_core::session::{SessionOptions, TerminalSession};
use chai_render::Renderer;
use tracing::{debug, info};

use crate::command::{dispatch, Cmd};
use crate::input::spawn_input_reader;
use crate::message::Msg;
use crate::model::Model;

/// Configuration for a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Run in the alternate screen buffer (default: false).
    pub alt_screen: bool,
    /// How long a lone ESC byte may wait for a follow-up before it is
    /// reported as the Escape key (default: 50 ms).
    pub esc_timeout: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alt_screen: false,
            esc_timeout: Duration::from_millis(50),
        }
    }
}

impl ProgramConfig {
    /// Toggle the alternate screen.
    #[must_use]
    pub fn alt_screen(mut self, enabled: bool) -> Self {
        self.alt_screen = enabled;
        self
    }

    /// Tune the ESC disambiguation window.
    #[must_use]
    pub fn esc_timeout(mut self, timeout: Duration) -> Self {
        self.esc_timeout = timeout;
        self
    }
}

/// Why a run ended early.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// Stdin/stdout is not a terminal, or raw mode could not be entered.
    #[error("terminal unavailable: {0}")]
    TerminalUnavailable(#[source] io::Error),

    /// A read or write on the terminal failed mid-run.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The model panicked inside `init`, `update`, or `view`.
    #[error("model panicked during {phase}: {message}")]
    ModelPanic {
        /// Which model function was running.
        phase: &'static str,
        /// The panic payload, stringified.
        message: String,
    },
}

/// Drives a [`Model`] against a real terminal.
///
/// Construction is cheap and infallible; all terminal work happens in
/// [`run`](Self::run). However `run` returns, the terminal is restored.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    queue: Sender<Msg<M::Custom>>,
    inbox: Receiver<Msg<M::Custom>>,
}

impl<M: Model> Program<M> {
    /// Create a program with default configuration.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self::with_config(model, ProgramConfig::default())
    }

    /// Create a program with custom configuration.
    #[must_use]
    pub fn with_config(model: M, config: ProgramConfig) -> Self {
        let (queue, inbox) = mpsc::channel();
        Self {
            model,
            config,
            queue,
            inbox,
        }
    }

    /// A clonable handle for injecting messages from outside the loop
    /// (other threads, async bridges, tests).
    #[must_use]
    pub fn sender(&self) -> Sender<Msg<M::Custom>> {
        self.queue.clone()
    }

    /// Run until quit. Returns the final model.
    ///
    /// # Errors
    ///
    /// [`ProgramError::TerminalUnavailable`] when the terminal cannot be
    /// set up (nothing was started); [`ProgramError::Io`] when terminal
    /// I/O fails mid-run; [`ProgramError::ModelPanic`] when the model
    /// panics. In every case the terminal state is restored before this
    /// returns.
    pub fn run(mut self) -> Result<M, ProgramError> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: self.config.alt_screen,
        })
        .map_err(ProgramError::TerminalUnavailable)?;

        let (width, height) = session.size()?;
        info!(width, height, alt_screen = self.config.alt_screen, "program starting");

        let mut renderer = Renderer::new(width, height);
        let mut out = io::stdout();

        spawn_input_reader(self.queue.clone(), self.config.esc_timeout)?;

        #[cfg(unix)]
        let _resize_watcher = {
            let resize_queue = self.queue.clone();
            ResizeWatcher::spawn(move |width, height| {
                let _ = resize_queue.send(Msg::Resize { width, height });
            })?
        };

        let init_cmd = run_model_phase("init", || self.model.init())?;
        dispatch(init_cmd, &self.queue);

        let _ = self.queue.send(Msg::Resize { width, height });

        let result = self.event_loop(&mut renderer, &mut out);
        // The session drop restores the terminal on success and on every
        // error path out of the loop.
        drop(session);
        info!("program stopped");
        result.map(|()| self.model)
    }

    fn event_loop<W: Write>(
        &mut self,
        renderer: &mut Renderer,
        out: &mut W,
    ) -> Result<(), ProgramError> {
        loop {
            let Ok(msg) = self.inbox.recv() else {
                return Ok(());
            };

            match msg {
                Msg::Quit => {
                    debug!("quit message received");
                    return Ok(());
                }
                Msg::Resize { width, height } => {
                    debug!(width, height, "applying resize");
                    renderer.resize(width, height);
                    renderer.reset(out)?;
                    self.step(Msg::Resize { width, height })?;
                }
                msg => self.step(msg)?,
            }

            let frame = run_model_phase("view", || self.model.view())?;
            renderer.render(out, &frame)?;
        }
    }

    /// One update plus command dispatch.
    fn step(&mut self, msg: Msg<M::Custom>) -> Result<(), ProgramError> {
        let cmd = run_model_phase("update", || self.model.update(msg))?;
        dispatch(cmd, &self.queue);
        Ok(())
    }
}

/// Run a model callback, converting a panic into [`ProgramError::ModelPanic`].
fn run_model_phase<T>(
    phase: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T, ProgramError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        ProgramError::ModelPanic { phase, message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chai_core::event::{KeyCode, KeyEvent};

    struct Counter {
        count: i64,
    }

    impl Model for Counter {
        type Custom = ();

        fn update(&mut self, msg: Msg<()>) -> Cmd<()> {
            match msg {
                Msg::Key(key) if key.code == KeyCode::Up => {
                    self.count += 1;
                    Cmd::none()
                }
                Msg::Key(key) if key.code == KeyCode::Down => {
                    self.count -= 1;
                    Cmd::none()
                }
                Msg::Key(key) if key.is_char('q') => Cmd::quit(),
                _ => Cmd::none(),
            }
        }

        fn view(&self) -> String {
            format!("Count: {}", self.count)
        }
    }

    #[test]
    fn config_defaults() {
        let config = ProgramConfig::default();
        assert!(!config.alt_screen);
        assert_eq!(config.esc_timeout, Duration::from_millis(50));
    }

    #[test]
    fn config_builders() {
        let config = ProgramConfig::default()
            .alt_screen(true)
            .esc_timeout(Duration::from_millis(10));
        assert!(config.alt_screen);
        assert_eq!(config.esc_timeout, Duration::from_millis(10));
    }

    #[test]
    fn sender_reaches_the_inbox() {
        let program = Program::new(Counter { count: 0 });
        let sender = program.sender();
        sender.send(Msg::User(())).expect("open channel");
        assert_eq!(program.inbox.try_recv().ok(), Some(Msg::User(())));
    }

    #[test]
    fn model_phase_passthrough() {
        let value = run_model_phase("update", || 41 + 1).expect("no panic");
        assert_eq!(value, 42);
    }

    #[test]
    fn model_phase_captures_panics() {
        let result: Result<(), ProgramError> =
            run_model_phase("view", || panic!("render exploded"));
        match result.expect_err("panic expected") {
            ProgramError::ModelPanic { phase, message } => {
                assert_eq!(phase, "view");
                assert_eq!(message, "render exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn counter_update_view_cycle() {
        let mut model = Counter { count: 0 };
        assert_eq!(model.view(), "Count: 0");

        let up = Msg::Key(KeyEvent::new(KeyCode::Up));
        let down = Msg::Key(KeyEvent::new(KeyCode::Down));
        assert!(matches!(model.update(up.clone()), Cmd::None));
        assert_eq!(model.view(), "Count: 1");
        assert!(matches!(model.update(up), Cmd::None));
        assert_eq!(model.view(), "Count: 2");
        assert!(matches!(model.update(down), Cmd::None));
        assert_eq!(model.view(), "Count: 1");

        let quit = Msg::Key(KeyEvent::new(KeyCode::Char('q')));
        assert!(matches!(model.update(quit), Cmd::Quit));
    }
}
