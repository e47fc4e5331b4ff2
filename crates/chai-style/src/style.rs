#![forbid(unsafe_code)]

//! The immutable style builder and its render pipeline.

use chai_text::{pad_right, truncate, visible_width, word_wrap};

use crate::border::{Border, Sides};
use crate::color::Rgb;

/// Horizontal alignment: flush left.
pub const LEFT: f64 = 0.0;
/// Horizontal alignment: centered.
pub const CENTER: f64 = 0.5;
/// Horizontal alignment: flush right.
pub const RIGHT: f64 = 1.0;

/// Per-side cell counts for padding and margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    /// Cells above.
    pub top: u16,
    /// Cells to the right.
    pub right: u16,
    /// Cells below.
    pub bottom: u16,
    /// Cells to the left.
    pub left: u16,
}

impl Edges {
    /// Construct from explicit top/right/bottom/left values.
    #[must_use]
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    const fn horizontal(self) -> usize {
        self.left as usize + self.right as usize
    }
}

// CSS shorthand: 1 value = all sides; 2 = vertical/horizontal;
// 3 = top/horizontal/bottom; 4 = top/right/bottom/left.

impl From<u16> for Edges {
    fn from(all: u16) -> Self {
        Self::new(all, all, all, all)
    }
}

impl From<(u16, u16)> for Edges {
    fn from((vertical, horizontal): (u16, u16)) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl From<(u16, u16, u16)> for Edges {
    fn from((top, horizontal, bottom): (u16, u16, u16)) -> Self {
        Self::new(top, horizontal, bottom, horizontal)
    }
}

impl From<(u16, u16, u16, u16)> for Edges {
    fn from((top, right, bottom, left): (u16, u16, u16, u16)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

/// An immutable bundle of text attributes, spacing, sizing, and border.
///
/// Every setter returns a modified copy; the receiver is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    reverse: bool,
    strikethrough: bool,
    padding: Edges,
    margin: Edges,
    width: u16,
    height: u16,
    max_width: u16,
    max_height: u16,
    align: f64,
    border: Option<Border>,
    border_sides: Sides,
    border_fg: Option<Rgb>,
    wrap: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            dim: false,
            italic: false,
            underline: false,
            reverse: false,
            strikethrough: false,
            padding: Edges::default(),
            margin: Edges::default(),
            width: 0,
            height: 0,
            max_width: 0,
            max_height: 0,
            align: LEFT,
            border: None,
            border_sides: Sides::ALL,
            border_fg: None,
            wrap: true,
        }
    }
}

macro_rules! setter {
    ($(#[$doc:meta])* $name:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(&self, value: $ty) -> Self {
            let mut style = self.clone();
            style.$field = value;
            style
        }
    };
    ($(#[$doc:meta])* $name:ident, $field:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $name(&self) -> Self {
            let mut style = self.clone();
            style.$field = true;
            style
        }
    };
}

impl Style {
    /// A style with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    setter!(
        /// Bold text.
        bold,
        bold
    );
    setter!(
        /// Dim text.
        dim,
        dim
    );
    setter!(
        /// Italic text.
        italic,
        italic
    );
    setter!(
        /// Underlined text.
        underline,
        underline
    );
    setter!(
        /// Reverse video.
        reverse,
        reverse
    );
    setter!(
        /// Struck-through text.
        strikethrough,
        strikethrough
    );

    /// Foreground color.
    #[must_use]
    pub fn fg(&self, color: Rgb) -> Self {
        let mut style = self.clone();
        style.fg = Some(color);
        style
    }

    /// Background color.
    #[must_use]
    pub fn bg(&self, color: Rgb) -> Self {
        let mut style = self.clone();
        style.bg = Some(color);
        style
    }

    /// Inner padding, CSS shorthand: `padding(1)`, `padding((0, 2))`,
    /// `padding((1, 2, 3))`, or `padding((1, 2, 3, 4))`.
    #[must_use]
    pub fn padding(&self, edges: impl Into<Edges>) -> Self {
        let mut style = self.clone();
        style.padding = edges.into();
        style
    }

    /// Outer margin, same shorthand as [`padding`](Self::padding).
    #[must_use]
    pub fn margin(&self, edges: impl Into<Edges>) -> Self {
        let mut style = self.clone();
        style.margin = edges.into();
        style
    }

    setter!(
        /// Fixed block width in columns, including padding but not the
        /// border. Zero means natural width.
        width,
        width: u16
    );
    setter!(
        /// Minimum content rows. Zero means natural height.
        height,
        height: u16
    );
    setter!(
        /// Hard cap on width; longer lines are truncated.
        max_width,
        max_width: u16
    );
    setter!(
        /// Hard cap on rows; extra rows are dropped.
        max_height,
        max_height: u16
    );
    setter!(
        /// Horizontal alignment in `[0.0, 1.0]`; see [`LEFT`],
        /// [`CENTER`], [`RIGHT`].
        align,
        align: f64
    );

    /// Draw a border on all sides.
    #[must_use]
    pub fn border(&self, border: Border) -> Self {
        let mut style = self.clone();
        style.border = Some(border);
        style.border_sides = Sides::ALL;
        style
    }

    /// Limit the border to specific sides.
    #[must_use]
    pub fn border_sides(&self, sides: Sides) -> Self {
        let mut style = self.clone();
        style.border_sides = sides;
        style
    }

    /// Color the border glyphs.
    #[must_use]
    pub fn border_fg(&self, color: Rgb) -> Self {
        let mut style = self.clone();
        style.border_fg = Some(color);
        style
    }

    setter!(
        /// Whether a fixed width word-wraps its content (on by default).
        wrap,
        wrap: bool
    );

    /// Apply the style to `content` and return the finished block.
    #[must_use]
    pub fn render(&self, content: &str) -> String {
        let pad_h = self.padding.horizontal();
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

        // Wrap to the content area inside the padding.
        let inner = if self.width > 0 {
            (self.width as usize).saturating_sub(pad_h)
        } else {
            0
        };
        if inner > 0 && self.wrap {
            lines = lines
                .iter()
                .flat_map(|line| {
                    word_wrap(line, inner)
                        .split('\n')
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect();
        }

        // Alignment pads every line to the same inner width.
        let inner = if self.width > 0 {
            (self.width as usize).saturating_sub(pad_h)
        } else {
            lines.iter().map(|l| visible_width(l)).max().unwrap_or(0)
        };
        lines = lines
            .iter()
            .map(|line| {
                let line = if visible_width(line) > inner {
                    truncate(line, inner)
                } else {
                    line.clone()
                };
                align_line(&line, inner, self.align)
            })
            .collect();

        // Minimum height, top-aligned.
        while self.height > 0 && lines.len() < self.height as usize {
            lines.push(" ".repeat(inner));
        }

        // Hard caps.
        if self.max_height > 0 && lines.len() > self.max_height as usize {
            lines.truncate(self.max_height as usize);
        }
        if self.max_width > 0 {
            lines = lines
                .iter()
                .map(|line| truncate(line, self.max_width as usize))
                .collect();
            // Wide characters can truncate short of the cap; renormalize
            // so the block stays rectangular.
            let w = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
            lines = lines.iter().map(|l| pad_right(l, w)).collect();
        }

        // Text attributes wrap the content only; a trailing reset per
        // line keeps the style from bleeding into padding and border.
        let prefix = self.sgr_prefix();
        if !prefix.is_empty() {
            lines = lines
                .iter()
                .map(|line| format!("{prefix}{line}{}", chai_text::ansi::SGR_RESET))
                .collect();
        }

        lines = self.apply_padding(lines);
        lines = self.apply_border(lines);
        self.apply_margin(lines)
    }

    fn sgr_prefix(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        for (on, code) in [
            (self.bold, "1"),
            (self.dim, "2"),
            (self.italic, "3"),
            (self.underline, "4"),
            (self.reverse, "7"),
            (self.strikethrough, "9"),
        ] {
            if on {
                params.push(code.to_string());
            }
        }
        if let Some(fg) = self.fg {
            let mut p = String::new();
            fg.fg_params(&mut p);
            params.push(p);
        }
        if let Some(bg) = self.bg {
            let mut p = String::new();
            bg.bg_params(&mut p);
            params.push(p);
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("\x1b[{}m", params.join(";"))
        }
    }

    fn apply_padding(&self, lines: Vec<String>) -> Vec<String> {
        let pad = self.padding;
        if pad == Edges::default() {
            return lines;
        }
        let left = " ".repeat(pad.left as usize);
        let right = " ".repeat(pad.right as usize);
        let mut out: Vec<String> = lines
            .iter()
            .map(|line| format!("{left}{line}{right}"))
            .collect();
        let total = out.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let blank = " ".repeat(total);
        for _ in 0..pad.top {
            out.insert(0, blank.clone());
        }
        for _ in 0..pad.bottom {
            out.push(blank.clone());
        }
        out
    }

    fn apply_border(&self, lines: Vec<String>) -> Vec<String> {
        let Some(b) = self.border else {
            return lines;
        };
        let sides = self.border_sides;
        if sides.is_empty() {
            return lines;
        }
        let content_w = lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let mut out = Vec::with_capacity(lines.len() + 2);

        if sides.contains(Sides::TOP) {
            let mut row = String::new();
            if sides.contains(Sides::LEFT) {
                row.push(b.top_left);
            }
            row.extend(std::iter::repeat(b.top).take(content_w));
            if sides.contains(Sides::RIGHT) {
                row.push(b.top_right);
            }
            out.push(self.paint_border(&row));
        }

        for line in &lines {
            let mut row = String::new();
            if sides.contains(Sides::LEFT) {
                row.push_str(&self.paint_border(&b.left.to_string()));
            }
            row.push_str(&pad_right(line, content_w));
            if sides.contains(Sides::RIGHT) {
                row.push_str(&self.paint_border(&b.right.to_string()));
            }
            out.push(row);
        }

        if sides.contains(Sides::BOTTOM) {
            let mut row = String::new();
            if sides.contains(Sides::LEFT) {
                row.push(b.bottom_left);
            }
            row.extend(std::iter::repeat(b.bottom).take(content_w));
            if sides.contains(Sides::RIGHT) {
                row.push(b.bottom_right);
            }
            out.push(self.paint_border(&row));
        }

        out
    }

    fn paint_border(&self, glyphs: &str) -> String {
        match self.border_fg {
            Some(color) => {
                let mut params = String::new();
                color.fg_params(&mut params);
                format!("\x1b[{params}m{glyphs}{}", chai_text::ansi::SGR_RESET)
            }
            None => glyphs.to_string(),
        }
    }

    fn apply_margin(&self, lines: Vec<String>) -> String {
        let margin = self.margin;
        if margin == Edges::default() {
            return lines.join("\n");
        }
        let left = " ".repeat(margin.left as usize);
        let right = " ".repeat(margin.right as usize);
        let mut out: Vec<String> = lines
            .iter()
            .map(|line| format!("{left}{line}{right}"))
            .collect();
        let total = out.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        let blank = " ".repeat(total);
        for _ in 0..margin.top {
            out.insert(0, blank.clone());
        }
        for _ in 0..margin.bottom {
            out.push(blank.clone());
        }
        out.join("\n")
    }
}

fn align_line(line: &str, width: usize, align: f64) -> String {
    let vw = visible_width(line);
    if vw >= width {
        return line.to_string();
    }
    let gap = width - vw;
    let left = (gap as f64 * align.clamp(0.0, 1.0)) as usize;
    format!(
        "{}{}{}",
        " ".repeat(left),
        line,
        " ".repeat(gap - left)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(block: &str) -> Vec<&str> {
        block.split('\n').collect()
    }

    fn assert_rectangular(block: &str) {
        let widths: Vec<usize> = block.split('\n').map(visible_width).collect();
        assert!(
            widths.windows(2).all(|w| w[0] == w[1]),
            "uneven block: {widths:?}\n{block}"
        );
    }

    #[test]
    fn setters_do_not_mutate_receiver() {
        let base = Style::new();
        let _ = base.bold();
        let _ = base.fg(Rgb::new(1, 2, 3));
        let _ = base.padding(2);
        let _ = base.width(40);
        let _ = base.border(Border::DOUBLE);
        assert_eq!(base, Style::new());
    }

    #[test]
    fn plain_render_is_identity() {
        assert_eq!(Style::new().render("hi"), "hi");
        assert_eq!(Style::new().render("a\nbb"), "a \nbb");
    }

    #[test]
    fn sgr_wraps_each_line() {
        let out = Style::new().bold().render("a\nb");
        assert_eq!(out, "\x1b[1ma\x1b[0m\n\x1b[1mb\x1b[0m");
    }

    #[test]
    fn fg_bg_codes() {
        let out = Style::new()
            .fg(Rgb::new(1, 2, 3))
            .bg(Rgb::new(4, 5, 6))
            .render("x");
        assert_eq!(out, "\x1b[38;2;1;2;3;48;2;4;5;6mx\x1b[0m");
    }

    #[test]
    fn width_wraps_and_pads() {
        let out = Style::new().width(5).render("hello world");
        assert_eq!(out, "hello\nworld");
        assert_rectangular(&out);
    }

    #[test]
    fn align_center_and_right() {
        let centered = Style::new().width(6).align(CENTER).render("hi");
        assert_eq!(centered, "  hi  ");
        let right = Style::new().width(6).align(RIGHT).render("hi");
        assert_eq!(right, "    hi");
    }

    #[test]
    fn padding_stays_uncolored() {
        let out = Style::new().bg(Rgb::new(9, 9, 9)).padding((0, 1)).render("x");
        assert!(out.starts_with(' '));
        assert!(out.ends_with(' '));
        assert_rectangular(&out);
    }

    #[test]
    fn height_pads_blank_lines() {
        let out = Style::new().width(3).height(3).render("a");
        assert_eq!(lines(&out).len(), 3);
        assert_rectangular(&out);
    }

    #[test]
    fn max_height_drops_rows() {
        let out = Style::new().max_height(2).render("a\nb\nc\nd");
        assert_eq!(lines(&out).len(), 2);
    }

    #[test]
    fn max_width_truncates() {
        let out = Style::new().max_width(3).render("abcdef");
        assert_eq!(out, "abc");
    }

    #[test]
    fn bordered_padded_box_geometry() {
        let out = Style::new()
            .border(Border::NORMAL)
            .padding(1)
            .width(10)
            .render("hi");
        let rows = lines(&out);
        assert_eq!(rows.len(), 5);
        for row in &rows {
            assert_eq!(visible_width(row), 12);
        }
        assert!(rows[0].starts_with('┌') && rows[0].ends_with('┐'));
        assert!(rows[4].starts_with('└') && rows[4].ends_with('┘'));
        assert_eq!(rows[2], "│ hi       │");
    }

    #[test]
    fn border_sides_mask() {
        let out = Style::new()
            .border(Border::NORMAL)
            .border_sides(Sides::LEFT | Sides::RIGHT)
            .render("ab");
        assert_eq!(out, "│ab│");
    }

    #[test]
    fn border_fg_colors_glyphs_only() {
        let out = Style::new()
            .border(Border::NORMAL)
            .border_fg(Rgb::new(7, 7, 7))
            .render("x");
        let rows = lines(&out);
        assert!(rows[0].starts_with("\x1b[38;2;7;7;7m"));
        // Content row: colored glyph, reset, then the uncolored content.
        assert!(rows[1].contains("\x1b[0mx"));
        assert_rectangular(&out);
    }

    #[test]
    fn margin_adds_uncolored_frame() {
        let out = Style::new().margin(1).render("ab");
        let rows = lines(&out);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "    ");
        assert_eq!(rows[1], " ab ");
        assert_rectangular(&out);
    }

    #[test]
    fn rounded_border_corners() {
        let out = Style::new().border(Border::ROUNDED).render("x");
        let rows = lines(&out);
        assert!(rows[0].starts_with('╭'));
        assert!(rows[2].ends_with('╯'));
    }

    #[test]
    fn rectangular_with_wide_chars() {
        let out = Style::new().width(8).border(Border::NORMAL).render("你好 ok");
        assert_rectangular(&out);
    }

    #[test]
    fn hex_color_round_trip() {
        let style = Style::new().fg(Rgb::from_hex("#FAFAFA").unwrap_or(Rgb::new(0, 0, 0)));
        assert!(style.render("x").starts_with("\x1b[38;2;250;250;250m"));
    }
}
