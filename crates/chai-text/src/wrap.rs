#![forbid(unsafe_code)]

//! Greedy word wrapping that survives embedded escape sequences.
//!
//! Lines are wrapped at ASCII spaces; tokens wider than the target are
//! hard-broken at the width. Escape sequences ride along with the token
//! they appear in, and SGR sequences that are still open when a line
//! breaks are re-applied at the start of the continuation line so styling
//! spans wraps intact.

use crate::ansi::{char_width, escape_len, sgr_state, truncate, visible_width};

/// Wrap `s` so every line fits in `width` visible columns.
///
/// Input newlines force breaks. A `width` of zero returns the input
/// unchanged.
#[must_use]
pub fn word_wrap(s: &str, width: usize) -> String {
    if width == 0 {
        return s.to_string();
    }
    let mut out: Vec<String> = Vec::new();
    for line in s.split('\n') {
        if visible_width(line) <= width {
            out.push(line.to_string());
        } else {
            wrap_line(line, width, &mut out);
        }
    }
    out.join("\n")
}

/// A run of spaces or a run of non-space characters, with any escape
/// sequences it contained.
#[derive(Debug)]
struct Token {
    text: String,
    is_space: bool,
}

fn tokenize(line: &str) -> Vec<Token> {
    let bytes = line.as_bytes();
    let mut tokens: Vec<Token> = Vec::new();
    let mut buf = String::new();
    let mut buf_space: Option<bool> = None;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = escape_len(&bytes[i..]) {
            // Escapes attach to the token in progress.
            buf.push_str(&line[i..i + len]);
            i += len;
            continue;
        }
        let Some(ch) = line[i..].chars().next() else {
            break;
        };
        let is_space = ch == ' ';
        if buf_space.is_some_and(|prev| prev != is_space) {
            tokens.push(Token {
                text: std::mem::take(&mut buf),
                is_space: !is_space,
            });
        }
        buf.push(ch);
        buf_space = Some(is_space);
        i += ch.len_utf8();
    }
    if !buf.is_empty() {
        tokens.push(Token {
            text: buf,
            is_space: buf_space.unwrap_or(false),
        });
    }
    tokens
}

/// Record the SGR effect of every escape sequence in `text` into the
/// active-sequence stack.
fn track_sgr(text: &str, active: &mut Vec<String>) {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = escape_len(&bytes[i..]) {
            let seq = &text[i..i + len];
            match sgr_state(seq) {
                Some(true) => active.push(seq.to_string()),
                Some(false) => active.clear(),
                None => {}
            }
            i += len;
        } else {
            let Some(ch) = text[i..].chars().next() else {
                break;
            };
            i += ch.len_utf8();
        }
    }
}

/// Break a single over-long token into pieces of at most `width` columns.
fn hard_break(token: &str, width: usize) -> Vec<String> {
    let bytes = token.as_bytes();
    let mut pieces: Vec<String> = Vec::new();
    let mut piece = String::new();
    let mut piece_w = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(len) = escape_len(&bytes[i..]) {
            piece.push_str(&token[i..i + len]);
            i += len;
            continue;
        }
        let Some(ch) = token[i..].chars().next() else {
            break;
        };
        let cw = char_width(ch);
        if piece_w + cw > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_w = 0;
        }
        piece.push(ch);
        piece_w += cw;
        i += ch.len_utf8();
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut cur = String::new();
    let mut cur_w = 0;
    let mut active: Vec<String> = Vec::new();
    let mut pending_space: Option<String> = None;

    let flush = |cur: &mut String, cur_w: &mut usize, active: &[String], out: &mut Vec<String>| {
        out.push(std::mem::take(cur));
        *cur = active.concat();
        *cur_w = 0;
    };

    for token in tokenize(line) {
        if token.is_space {
            // Held back until the next word lands on this line; spaces at
            // a break point are dropped.
            track_sgr(&token.text, &mut active);
            pending_space = Some(token.text);
            continue;
        }

        let word_w = visible_width(&token.text);
        let space = pending_space.take();
        let space_w = space.as_deref().map(visible_width).unwrap_or(0);

        if cur_w > 0 && cur_w + space_w + word_w > width {
            flush(&mut cur, &mut cur_w, &active, out);
        } else if let Some(sp) = space {
            // Clip a space run that would overrun the margin on its own.
            let room = width - cur_w;
            if space_w <= room {
                cur.push_str(&sp);
                cur_w += space_w;
            } else {
                cur.push_str(&truncate(&sp, room));
                cur_w = width;
            }
        }

        if word_w > width {
            let pieces = hard_break(&token.text, width);
            let last = pieces.len().saturating_sub(1);
            for (idx, piece) in pieces.into_iter().enumerate() {
                if cur_w > 0 {
                    flush(&mut cur, &mut cur_w, &active, out);
                }
                let piece_w = visible_width(&piece);
                cur.push_str(&piece);
                cur_w += piece_w;
                // Absorb this piece's SGR effects before the break so
                // every continuation line reopens them.
                track_sgr(&piece, &mut active);
                if idx < last {
                    flush(&mut cur, &mut cur_w, &active, out);
                }
            }
        } else {
            // Leading spaces can fill the line before the first word.
            if cur_w + word_w > width {
                flush(&mut cur, &mut cur_w, &active, out);
            }
            cur.push_str(&token.text);
            cur_w += word_w;
            track_sgr(&token.text, &mut active);
        }
    }

    if !cur.is_empty() || out.is_empty() {
        out.push(cur);
    }
}
