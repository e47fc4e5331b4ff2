#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII-based terminal lifecycle management that ensures cleanup even on
//! panic. The session owns raw-mode entry/exit and tracks every terminal
//! state change it makes.
//!
//! # Lifecycle guarantees
//!
//! 1. Each enabled mode (raw, alt-screen, hidden cursor) has a tracked
//!    flag.
//! 2. Drop restores previous state in reverse order of enabling.
//! 3. A process-wide panic hook (installed once) performs best-effort
//!    restoration before the panic message prints, so unwinding never
//!    leaves the user's shell in raw mode.
//!
//! Raw-mode toggling and the size query go through `crossterm`; every
//! escape sequence this session writes is emitted directly from the
//! constants below. Crossterm's event pipeline is not used — input bytes
//! are read straight from stdin so the input parser sees all of them.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::sync::OnceLock;

use tracing::{debug, info};

/// Enter the alternate screen buffer (`CSI ? 1049 h`).
pub const ALT_SCREEN_ENTER: &[u8] = b"\x1b[?1049h";
/// Leave the alternate screen buffer (`CSI ? 1049 l`).
pub const ALT_SCREEN_LEAVE: &[u8] = b"\x1b[?1049l";
/// Hide the cursor (`CSI ? 25 l`).
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
/// Show the cursor (`CSI ? 25 h`).
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";
/// Erase the whole screen (`CSI 2 J`).
pub const ERASE_ALL: &[u8] = b"\x1b[2J";
/// Move the cursor home (`CSI H`).
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
/// End synchronized output (`CSI ? 2026 l`), in case a frame was cut off.
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Terminal session configuration. Defaults to the least intrusive
/// setup: raw mode and a hidden cursor on the primary screen.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enter the alternate screen buffer, preserving the user's
    /// scrollback for the duration of the session.
    pub alternate_screen: bool,
}

/// A terminal session that manages raw mode and cleanup.
///
/// # Contract
///
/// - Only one session should exist at a time.
/// - Creating a session verifies stdin/stdout are terminals and enters
///   raw mode; dropping it restores everything it changed.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
    raw_mode_enabled: bool,
}

impl TerminalSession {
    /// Verify the terminal, enter raw mode, and apply the options.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin or stdout is not a terminal or raw
    /// mode cannot be enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin/stdout is not a terminal",
            ));
        }

        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            cursor_hidden: false,
            raw_mode_enabled: true,
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            // Clear and home after entering: some terminals show stale
            // alt-screen content otherwise.
            stdout.write_all(ALT_SCREEN_ENTER)?;
            stdout.write_all(ERASE_ALL)?;
            stdout.write_all(CURSOR_HOME)?;
            session.alternate_screen_enabled = true;
            debug!("alternate screen enabled");
        }

        stdout.write_all(CURSOR_HIDE)?;
        session.cursor_hidden = true;
        stdout.flush()?;

        Ok(session)
    }

    /// Current terminal size as `(columns, rows)`.
    ///
    /// Some terminals briefly report a degenerate size on startup; fall
    /// back to `COLUMNS`/`LINES` and clamp to a minimum viable 2x2.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let (w, h) = crossterm::terminal::size()?;
        if w > 1 && h > 1 {
            return Ok((w, h));
        }
        if let Some(fallback) = size_from_env() {
            return Ok(fallback);
        }
        Ok((w.max(2), h.max(2)))
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(CURSOR_SHOW)?;
        stdout.flush()?;
        self.cursor_hidden = false;
        Ok(())
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(CURSOR_HIDE)?;
        stdout.flush()?;
        self.cursor_hidden = true;
        Ok(())
    }

    /// Cleanup shared between drop and the panic path.
    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        // End synchronized output first so buffered content appears.
        let _ = stdout.write_all(SYNC_END);

        if self.cursor_hidden {
            let _ = stdout.write_all(CURSOR_SHOW);
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            let _ = stdout.write_all(ALT_SCREEN_LEAVE);
            self.alternate_screen_enabled = false;
            debug!("alternate screen disabled");
        }

        if self.raw_mode_enabled {
            let _ = crossterm::terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
            info!("terminal raw mode disabled");
        }

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn size_from_env() -> Option<(u16, u16)> {
    let cols = env::var("COLUMNS").ok()?.parse::<u16>().ok()?;
    let rows = env::var("LINES").ok()?.parse::<u16>().ok()?;
    if cols > 1 && rows > 1 {
        Some((cols, rows))
    } else {
        None
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_restore();
            previous(info);
        }));
    });
}

/// Best-effort terminal restoration for paths that skip `Drop`.
///
/// Used by the panic hook and the signal watcher before
/// `std::process::exit`, where destructors will not run. Idempotent.
pub fn best_effort_restore() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(SYNC_END);
    let _ = stdout.write_all(CURSOR_SHOW);
    let _ = stdout.write_all(ALT_SCREEN_LEAVE);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}
