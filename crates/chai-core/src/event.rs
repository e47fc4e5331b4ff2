#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! All events derive `Clone`, `PartialEq`, and `Eq` for use in tests and
//! pattern matching. Key events carry a structured [`KeyCode`] plus a
//! [`Modifiers`] bit set; the [`std::fmt::Display`] impl on [`KeyEvent`]
//! produces the conventional lowercase names (`"ctrl+c"`, `"shift+up"`,
//! `"esc"`, `"space"`, literal characters) for key-binding tables and
//! logs.

use std::fmt;

use bitflags::bitflags;

/// An input event delivered to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// Terminal was resized.
    Resize {
        /// New terminal width in columns.
        width: u16,
        /// New terminal height in rows.
        height: u16,
    },
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers to the event.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check for a specific unmodified character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.modifiers.is_empty() && matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl() {
            f.write_str("ctrl+")?;
        }
        if self.alt() {
            f.write_str("alt+")?;
        }
        // BackTab already spells out its shift.
        if self.shift() && !matches!(self.code, KeyCode::BackTab) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Escape => f.write_str("esc"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdown"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Null => f.write_str("ctrl+space"),
            KeyCode::Unknown => f.write_str("unknown"),
        }
    }
}

/// Key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return.
    Enter,

    /// Tab.
    Tab,

    /// Shift+Tab (back-tab).
    BackTab,

    /// Backspace.
    Backspace,

    /// Escape.
    Escape,

    /// Up arrow.
    Up,

    /// Down arrow.
    Down,

    /// Left arrow.
    Left,

    /// Right arrow.
    Right,

    /// Home.
    Home,

    /// End.
    End,

    /// Page Up.
    PageUp,

    /// Page Down.
    PageDown,

    /// Delete.
    Delete,

    /// Insert.
    Insert,

    /// Function key (F1–F12).
    F(u8),

    /// NUL byte (Ctrl+Space / Ctrl+@).
    Null,

    /// An escape sequence the parser did not recognize.
    Unknown,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
