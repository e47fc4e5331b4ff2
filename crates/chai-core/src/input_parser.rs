#![forbid(unsafe_code)]

//! Input parser state machine.
//!
//! Decodes terminal input bytes into [`crate::event::Event`] values. The
//! parser is resumable: feed it whatever chunk sizes the reader produces
//! and it carries partial sequences across calls.
//!
//! # Design
//!
//! A state machine over:
//! - ASCII characters and control codes
//! - UTF-8 multi-byte sequences
//! - CSI (Control Sequence Introducer) sequences with xterm modifier
//!   parameters
//! - SS3 (Single Shift 3) sequences
//! - OSC (Operating System Command) sequences, consumed without events
//!
//! A bare `ESC` is ambiguous: it may be the Escape key or the start of a
//! sequence. The parser never resolves that on its own — the reader calls
//! [`InputParser::flush`] once its disambiguation window expires with no
//! further bytes.
//!
//! # Robustness
//!
//! Length limits bound all sequence states so hostile input cannot grow
//! buffers without bound: CSI sequences cap at 256 bytes and OSC at 4 KB.
//! Unrecognized sequences recover locally as [`KeyCode::Unknown`] — they
//! never kill the stream.

use tracing::debug;

use crate::event::{Event, KeyCode, KeyEvent, Modifiers};

/// Maximum CSI sequence length before switching to discard mode.
const MAX_CSI_LEN: usize = 256;

/// Maximum OSC sequence length before switching to discard mode.
const MAX_OSC_LEN: usize = 4096;

/// Parser state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParserState {
    /// Normal character input.
    #[default]
    Ground,
    /// After ESC (0x1B).
    Escape,
    /// After ESC [ (CSI introducer).
    Csi,
    /// Collecting CSI parameters.
    CsiParam,
    /// Ignoring an oversized CSI sequence.
    CsiIgnore,
    /// After ESC O (SS3 introducer).
    Ss3,
    /// Collecting OSC content.
    Osc,
    /// After ESC inside OSC (for the ESC \ terminator).
    OscEscape,
    /// Ignoring an oversized OSC sequence.
    OscIgnore,
    /// Collecting a UTF-8 multi-byte sequence.
    Utf8 {
        /// Bytes collected so far.
        collected: u8,
        /// Total bytes expected.
        expected: u8,
    },
}

/// Terminal input parser.
///
/// ```
/// use chai_core::input_parser::InputParser;
/// use chai_core::event::{Event, KeyCode, KeyEvent};
///
/// let mut parser = InputParser::new();
/// let events = parser.parse(b"\x1b[A");
/// assert_eq!(events, vec![Event::Key(KeyEvent::new(KeyCode::Up))]);
/// ```
#[derive(Debug)]
pub struct InputParser {
    /// Current parser state.
    state: ParserState,
    /// Buffer for accumulating sequence bytes.
    buffer: Vec<u8>,
    /// UTF-8 bytes collected so far.
    utf8_buffer: [u8; 4],
    /// Event queued for the next iteration (a byte can finish one event
    /// and begin another).
    pending_event: Option<Event>,
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InputParser {
    /// Create a new input parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            buffer: Vec::with_capacity(64),
            utf8_buffer: [0; 4],
            pending_event: None,
        }
    }

    /// Parse input bytes and return any completed events.
    pub fn parse(&mut self, input: &[u8]) -> Vec<Event> {
        let mut events = Vec::new();
        for &byte in input {
            if let Some(event) = self.process_byte(byte) {
                events.push(event);
            }
            if let Some(pending) = self.pending_event.take() {
                events.push(pending);
            }
        }
        events
    }

    /// Whether a partial sequence (or a bare ESC) is waiting for more
    /// bytes. When this holds, the reader should arm its disambiguation
    /// timer and call [`flush`](Self::flush) on expiry.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.state != ParserState::Ground
    }

    /// Resolve a pending prefix after the disambiguation window expires.
    ///
    /// A bare ESC becomes the Escape key; a dangling CSI/SS3/OSC prefix
    /// becomes [`KeyCode::Unknown`]; a partial UTF-8 sequence is dropped.
    pub fn flush(&mut self) -> Option<Event> {
        let state = std::mem::take(&mut self.state);
        self.buffer.clear();
        match state {
            ParserState::Ground => None,
            ParserState::Escape => Some(Event::Key(KeyEvent::new(KeyCode::Escape))),
            ParserState::Utf8 { .. } => None,
            _ => {
                debug!("flushing incomplete escape sequence as unknown");
                Some(Event::Key(KeyEvent::new(KeyCode::Unknown)))
            }
        }
    }

    /// Process a single byte and optionally return an event.
    fn process_byte(&mut self, byte: u8) -> Option<Event> {
        match self.state {
            ParserState::Ground => self.process_ground(byte),
            ParserState::Escape => self.process_escape(byte),
            ParserState::Csi => self.process_csi(byte),
            ParserState::CsiParam => self.process_csi_param(byte),
            ParserState::CsiIgnore => self.process_csi_ignore(byte),
            ParserState::Ss3 => self.process_ss3(byte),
            ParserState::Osc => self.process_osc(byte),
            ParserState::OscEscape => self.process_osc_escape(byte),
            ParserState::OscIgnore => self.process_osc_ignore(byte),
            ParserState::Utf8 {
                collected,
                expected,
            } => self.process_utf8(byte, collected, expected),
        }
    }

    /// Process byte in ground state.
    fn process_ground(&mut self, byte: u8) -> Option<Event> {
        match byte {
            // ESC - start escape sequence
            0x1B => {
                self.state = ParserState::Escape;
                None
            }
            // NUL - Ctrl+Space or Ctrl+@
            0x00 => Some(Event::Key(KeyEvent::new(KeyCode::Null))),
            // Backspace alternate (Ctrl+H)
            0x08 => Some(Event::Key(KeyEvent::new(KeyCode::Backspace))),
            // Tab (Ctrl+I) - check before the generic Ctrl range
            0x09 => Some(Event::Key(KeyEvent::new(KeyCode::Tab))),
            // Enter (Ctrl+M) - check before the generic Ctrl range
            0x0D => Some(Event::Key(KeyEvent::new(KeyCode::Enter))),
            // Other Ctrl+A through Ctrl+Z
            0x01..=0x07 | 0x0A..=0x0C | 0x0E..=0x1A => {
                let c = (byte + b'a' - 1) as char;
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL),
                ))
            }
            // Backspace (DEL)
            0x7F => Some(Event::Key(KeyEvent::new(KeyCode::Backspace))),
            // Printable ASCII
            0x20..=0x7E => Some(Event::Key(KeyEvent::new(KeyCode::Char(byte as char)))),
            // UTF-8 lead bytes
            0xC0..=0xDF => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 2,
                };
                None
            }
            0xE0..=0xEF => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 3,
                };
                None
            }
            0xF0..=0xF7 => {
                self.utf8_buffer[0] = byte;
                self.state = ParserState::Utf8 {
                    collected: 1,
                    expected: 4,
                };
                None
            }
            // Invalid or ignored bytes
            _ => None,
        }
    }

    /// Process byte after ESC.
    fn process_escape(&mut self, byte: u8) -> Option<Event> {
        match byte {
            // CSI introducer
            b'[' => {
                self.state = ParserState::Csi;
                self.buffer.clear();
                None
            }
            // SS3 introducer
            b'O' => {
                self.state = ParserState::Ss3;
                None
            }
            // OSC introducer
            b']' => {
                self.state = ParserState::Osc;
                self.buffer.clear();
                None
            }
            // ESC ESC - Alt+Escape
            0x1B => {
                self.state = ParserState::Ground;
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Escape).with_modifiers(Modifiers::ALT),
                ))
            }
            // Alt+printable
            0x20..=0x7E => {
                self.state = ParserState::Ground;
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Char(byte as char)).with_modifiers(Modifiers::ALT),
                ))
            }
            // Invalid - return to ground
            _ => {
                self.state = ParserState::Ground;
                None
            }
        }
    }

    /// Process byte at start of CSI sequence.
    fn process_csi(&mut self, byte: u8) -> Option<Event> {
        // ESC restarts the sequence
        if byte == 0x1B {
            self.state = ParserState::Escape;
            self.buffer.clear();
            return None;
        }

        self.buffer.push(byte);

        match byte {
            // Parameter bytes (0x30-0x3F) and intermediate bytes (0x20-0x2F)
            0x20..=0x3F => {
                self.state = ParserState::CsiParam;
                None
            }
            // Final byte
            0x40..=0x7E => {
                self.state = ParserState::Ground;
                self.parse_csi_sequence()
            }
            _ => {
                self.state = ParserState::Ground;
                self.buffer.clear();
                None
            }
        }
    }

    /// Process byte while collecting CSI parameters.
    fn process_csi_param(&mut self, byte: u8) -> Option<Event> {
        if byte == 0x1B {
            self.state = ParserState::Escape;
            self.buffer.clear();
            return None;
        }

        if self.buffer.len() >= MAX_CSI_LEN {
            self.state = ParserState::CsiIgnore;
            self.buffer.clear();
            return None;
        }

        self.buffer.push(byte);

        match byte {
            0x20..=0x3F => None,
            0x40..=0x7E => {
                self.state = ParserState::Ground;
                self.parse_csi_sequence()
            }
            _ => {
                self.state = ParserState::Ground;
                self.buffer.clear();
                None
            }
        }
    }

    /// Ignore bytes until the end of an oversized CSI sequence.
    fn process_csi_ignore(&mut self, byte: u8) -> Option<Event> {
        if byte == 0x1B {
            self.state = ParserState::Escape;
            return None;
        }

        if let 0x40..=0x7E = byte {
            self.state = ParserState::Ground;
            return Some(Event::Key(KeyEvent::new(KeyCode::Unknown)));
        }
        None
    }

    /// Parse a complete CSI sequence from the buffer.
    fn parse_csi_sequence(&mut self) -> Option<Event> {
        let seq = std::mem::take(&mut self.buffer);
        let final_byte = *seq.last()?;
        let params = &seq[..seq.len() - 1];

        let event = match final_byte {
            b'A' => Some(key_with_modifiers(KeyCode::Up, params)),
            b'B' => Some(key_with_modifiers(KeyCode::Down, params)),
            b'C' => Some(key_with_modifiers(KeyCode::Right, params)),
            b'D' => Some(key_with_modifiers(KeyCode::Left, params)),
            b'H' => Some(key_with_modifiers(KeyCode::Home, params)),
            b'F' => Some(key_with_modifiers(KeyCode::End, params)),
            b'Z' => Some(
                KeyEvent::new(KeyCode::BackTab).with_modifiers(Modifiers::SHIFT),
            ),
            b'~' => parse_csi_tilde(params),
            _ => None,
        };

        match event {
            Some(key) => Some(Event::Key(key)),
            None => {
                debug!(final_byte, "unrecognized CSI sequence");
                Some(Event::Key(KeyEvent::new(KeyCode::Unknown)))
            }
        }
    }

    /// Process SS3 (ESC O) sequences.
    fn process_ss3(&mut self, byte: u8) -> Option<Event> {
        if byte == 0x1B {
            self.state = ParserState::Escape;
            return None;
        }

        self.state = ParserState::Ground;

        let code = match byte {
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            _ => KeyCode::Unknown,
        };

        Some(Event::Key(KeyEvent::new(code)))
    }

    /// Process OSC content. Consumed without producing events: the only
    /// OSC traffic on stdin is echo of sequences this workspace emits.
    fn process_osc(&mut self, byte: u8) -> Option<Event> {
        if byte == 0x1B {
            self.state = ParserState::OscEscape;
            return None;
        }

        if self.buffer.len() >= MAX_OSC_LEN {
            self.state = ParserState::OscIgnore;
            self.buffer.clear();
            return None;
        }

        match byte {
            // BEL terminates
            0x07 => {
                self.state = ParserState::Ground;
                self.buffer.clear();
                None
            }
            _ => {
                self.buffer.push(byte);
                None
            }
        }
    }

    /// Process ESC inside OSC (checking for the ST terminator).
    fn process_osc_escape(&mut self, byte: u8) -> Option<Event> {
        self.buffer.clear();
        if byte == b'\\' {
            self.state = ParserState::Ground;
            None
        } else if byte == 0x1B {
            self.state = ParserState::Escape;
            None
        } else {
            // The ESC cancelled the OSC; reparse this byte as an escape
            // follow-up.
            self.state = ParserState::Escape;
            self.process_escape(byte)
        }
    }

    /// Ignore bytes until the end of an oversized OSC sequence.
    fn process_osc_ignore(&mut self, byte: u8) -> Option<Event> {
        match byte {
            0x07 => {
                self.state = ParserState::Ground;
                None
            }
            0x1B => {
                self.state = ParserState::OscEscape;
                None
            }
            _ => None,
        }
    }

    /// Process UTF-8 continuation bytes.
    fn process_utf8(&mut self, byte: u8, collected: u8, expected: u8) -> Option<Event> {
        if (byte & 0xC0) != 0x80 {
            // Invalid continuation: emit a replacement character and
            // reprocess the unexpected byte from ground.
            self.state = ParserState::Ground;
            self.pending_event = self.process_ground(byte);
            return Some(Event::Key(KeyEvent::new(KeyCode::Char(
                char::REPLACEMENT_CHARACTER,
            ))));
        }

        self.utf8_buffer[collected as usize] = byte;
        let collected = collected + 1;

        if collected == expected {
            self.state = ParserState::Ground;
            let s = std::str::from_utf8(&self.utf8_buffer[..expected as usize]).ok()?;
            let c = s.chars().next()?;
            Some(Event::Key(KeyEvent::new(KeyCode::Char(c))))
        } else {
            self.state = ParserState::Utf8 {
                collected,
                expected,
            };
            None
        }
    }
}

/// xterm modifier encoding: value = 1 + bits, Shift=1, Alt=2, Ctrl=4.
fn modifiers_from_xterm(value: u32) -> Modifiers {
    let bits = value.saturating_sub(1);
    let mut mods = Modifiers::NONE;
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CTRL;
    }
    mods
}

/// Parse the modifier parameter (second field) from CSI params.
fn parse_modifier_param(params: &[u8]) -> Modifiers {
    let Ok(s) = std::str::from_utf8(params) else {
        return Modifiers::NONE;
    };
    let value: u32 = s
        .split(';')
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    modifiers_from_xterm(value)
}

fn key_with_modifiers(code: KeyCode, params: &[u8]) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(parse_modifier_param(params))
}

/// Parse CSI sequences ending in `~`.
fn parse_csi_tilde(params: &[u8]) -> Option<KeyEvent> {
    let s = std::str::from_utf8(params).ok()?;
    let num: u32 = s.split(';').next()?.parse().ok()?;
    let mods = parse_modifier_param(params);

    let code = match num {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        15 => KeyCode::F(5),
        17 => KeyCode::F(6),
        18 => KeyCode::F(7),
        19 => KeyCode::F(8),
        20 => KeyCode::F(9),
        21 => KeyCode::F(10),
        23 => KeyCode::F(11),
        24 => KeyCode::F(12),
        _ => return None,
    };

    Some(KeyEvent::new(code).with_modifiers(mods))
}
