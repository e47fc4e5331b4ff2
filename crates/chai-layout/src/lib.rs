#![forbid(unsafe_code)]

//! Joining and placing rendered blocks.
//!
//! A block is a multi-line string measured in visible columns. These
//! helpers combine blocks side by side, stack them, or embed one in a
//! fixed-size canvas — the composition primitives a `view()` uses to
//! build a frame out of styled pieces.
//!
//! Alignment positions are fractions in `[0.0, 1.0]`: `0.0` is the
//! start (left/top), `0.5` the center, `1.0` the end (right/bottom).

use chai_text::{pad_right, truncate, visible_width};

/// Left or top edge.
pub const START: f64 = 0.0;
/// Centered.
pub const CENTER: f64 = 0.5;
/// Right or bottom edge.
pub const END: f64 = 1.0;

/// Merge blocks side by side, aligning shorter blocks vertically.
#[must_use]
pub fn join_horizontal(align: f64, blocks: &[&str]) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    if blocks.len() == 1 {
        return blocks[0].to_string();
    }

    let split: Vec<Vec<&str>> = blocks.iter().map(|b| b.split('\n').collect()).collect();
    let widths: Vec<usize> = split
        .iter()
        .map(|lines| lines.iter().map(|l| visible_width(l)).max().unwrap_or(0))
        .collect();
    let max_height = split.iter().map(Vec::len).max().unwrap_or(0);

    let mut rows: Vec<String> = Vec::with_capacity(max_height);
    for row in 0..max_height {
        let mut line = String::new();
        for (lines, &width) in split.iter().zip(&widths) {
            let gap = max_height - lines.len();
            let top_pad = fraction(gap, align);
            let cell = if row >= top_pad && row - top_pad < lines.len() {
                pad_right(lines[row - top_pad], width)
            } else {
                " ".repeat(width)
            };
            line.push_str(&cell);
        }
        rows.push(line);
    }
    rows.join("\n")
}

/// Stack blocks vertically, aligning narrower blocks horizontally.
#[must_use]
pub fn join_vertical(align: f64, blocks: &[&str]) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    if blocks.len() == 1 {
        return blocks[0].to_string();
    }

    let lines: Vec<&str> = blocks.iter().flat_map(|b| b.split('\n')).collect();
    let max_width = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);

    let mut rows: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        let gap = max_width - visible_width(line);
        let left = fraction(gap, align);
        let mut row = " ".repeat(left);
        row.push_str(line);
        row.push_str(&" ".repeat(gap - left));
        rows.push(row);
    }
    rows.join("\n")
}

/// Embed `content` in a `width` x `height` canvas of spaces.
///
/// Content wider than the canvas is truncated; taller content is
/// clipped at the bottom.
#[must_use]
pub fn place(width: usize, height: usize, h_pos: f64, v_pos: f64, content: &str) -> String {
    let mut lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            let vw = visible_width(line);
            if vw > width {
                // The cut can land mid-wide-character and come up a
                // column short; pad back out to keep the canvas square.
                return pad_right(&truncate(line, width), width);
            }
            let gap = width - vw;
            let left = fraction(gap, h_pos);
            let mut row = " ".repeat(left);
            row.push_str(line);
            row.push_str(&" ".repeat(gap - left));
            row
        })
        .collect();

    if lines.len() < height {
        let gap = height - lines.len();
        let top = fraction(gap, v_pos);
        let blank = " ".repeat(width);
        for _ in 0..top {
            lines.insert(0, blank.clone());
        }
        for _ in 0..gap - top {
            lines.push(blank.clone());
        }
    } else if lines.len() > height {
        lines.truncate(height);
    }

    lines.join("\n")
}

fn fraction(total: usize, pos: f64) -> usize {
    (total as f64 * pos.clamp(0.0, 1.0)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rectangular(block: &str) {
        let widths: Vec<usize> = block.split('\n').map(visible_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }

    #[test]
    fn join_horizontal_basic() {
        let out = join_horizontal(START, &["aa\naa", "b"]);
        assert_eq!(out, "aab\naa ");
        assert_rectangular(&out);
    }

    #[test]
    fn join_horizontal_bottom_align() {
        let out = join_horizontal(END, &["aa\naa", "b"]);
        assert_eq!(out, "aa \naab");
    }

    #[test]
    fn join_horizontal_center_align() {
        let out = join_horizontal(CENTER, &["a\na\na", "b"]);
        assert_eq!(out, "a \nab\na ");
    }

    #[test]
    fn join_horizontal_single_passthrough() {
        assert_eq!(join_horizontal(START, &["x\ny"]), "x\ny");
        assert_eq!(join_horizontal(START, &[]), "");
    }

    #[test]
    fn join_vertical_basic() {
        let out = join_vertical(START, &["aaa", "b"]);
        assert_eq!(out, "aaa\nb  ");
        assert_rectangular(&out);
    }

    #[test]
    fn join_vertical_center_and_right() {
        assert_eq!(join_vertical(CENTER, &["aaaa", "bb"]), "aaaa\n bb ");
        assert_eq!(join_vertical(END, &["aaaa", "bb"]), "aaaa\n  bb");
    }

    #[test]
    fn join_measures_visible_width() {
        let out = join_vertical(START, &["\x1b[1maaa\x1b[0m", "b"]);
        assert_rectangular(&out);
    }

    #[test]
    fn place_centers_content() {
        let out = place(5, 3, CENTER, CENTER, "x");
        assert_eq!(out, "     \n  x  \n     ");
    }

    #[test]
    fn place_corners() {
        assert_eq!(place(3, 2, START, START, "x"), "x  \n   ");
        assert_eq!(place(3, 2, END, END, "x"), "   \n  x");
    }

    #[test]
    fn place_truncates_oversize() {
        let out = place(3, 1, START, START, "abcdef\nxyz");
        assert_eq!(out, "abc");
    }

    #[test]
    fn place_is_rectangular_with_wide_chars() {
        let out = place(6, 3, CENTER, CENTER, "你好");
        assert_rectangular(&out);
        assert_eq!(out.split('\n').count(), 3);
    }

    #[test]
    fn place_pads_wide_char_truncation() {
        // Truncating "你好X" to three columns cuts mid-ideograph and
        // leaves only two; the row must be padded back to the canvas.
        let out = place(3, 2, START, START, "你好X");
        assert_rectangular(&out);
        assert_eq!(out, "你 \n   ");
    }
}
