#![forbid(unsafe_code)]

//! Line-diff frame renderer.
//!
//! Each frame is a string split on `\n`. The renderer keeps the lines of
//! the previously written frame and, on the next one, rewrites only the
//! rows that differ: cursor-move, erase-in-line, new content. Unchanged
//! rows cost nothing; an unchanged frame writes nothing at all.
//!
//! The whole diff is bracketed in synchronized-output marks so the
//! terminal applies it atomically, and flushed once at the end.

use std::io::{self, Write};

use chai_text::truncate;
use tracing::debug;

use crate::ansi;

/// Diff state for one output stream.
#[derive(Debug)]
pub struct Renderer {
    prev_lines: Vec<String>,
    width: u16,
    height: u16,
}

impl Renderer {
    /// Create a renderer for a terminal of the given size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            prev_lines: Vec::new(),
            width,
            height,
        }
    }

    /// Current target size as `(columns, rows)`.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Adopt a new terminal size. Call [`reset`](Self::reset) afterwards
    /// so the next frame repaints every row.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Clear the screen and forget the previous frame.
    pub fn reset<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.prev_lines.clear();
        ansi::erase_display(out)?;
        ansi::cursor_home(out)?;
        out.flush()
    }

    /// Write `frame` to `out`, rewriting only the rows that changed
    /// since the last call.
    pub fn render<W: Write>(&mut self, out: &mut W, frame: &str) -> io::Result<()> {
        let mut new_lines: Vec<String> = frame
            .split('\n')
            .map(|line| truncate(line, self.width as usize))
            .collect();
        if new_lines.len() > self.height as usize {
            new_lines.truncate(self.height as usize);
        }

        let rows = new_lines.len().max(self.prev_lines.len());
        let mut in_frame = false;
        let mut rewritten = 0u16;
        for row in 0..rows {
            match (new_lines.get(row), self.prev_lines.get(row)) {
                (Some(new), Some(old)) if new == old => continue,
                (Some(new), _) => {
                    if !in_frame {
                        ansi::sync_begin(out)?;
                        in_frame = true;
                    }
                    ansi::cup(out, row as u16 + 1, 1)?;
                    ansi::erase_line(out)?;
                    out.write_all(new.as_bytes())?;
                    rewritten += 1;
                }
                // Row existed in the previous frame but not this one.
                (None, _) => {
                    if !in_frame {
                        ansi::sync_begin(out)?;
                        in_frame = true;
                    }
                    ansi::cup(out, row as u16 + 1, 1)?;
                    ansi::erase_line(out)?;
                }
            }
        }

        if in_frame {
            ansi::sync_end(out)?;
            debug!(rows = rows as u16, rewritten, "frame presented");
        }
        self.prev_lines = new_lines;
        out.flush()
    }
}
