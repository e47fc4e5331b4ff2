#![forbid(unsafe_code)]

//! Border glyph sets and side masks.

use bitflags::bitflags;

/// A border style: four corner glyphs and four edge glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    /// Top-left corner.
    pub top_left: char,
    /// Top edge.
    pub top: char,
    /// Top-right corner.
    pub top_right: char,
    /// Right edge.
    pub right: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Bottom edge.
    pub bottom: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Left edge.
    pub left: char,
}

impl Border {
    /// Single-line box drawing.
    pub const NORMAL: Self = Self {
        top_left: '┌',
        top: '─',
        top_right: '┐',
        right: '│',
        bottom_right: '┘',
        bottom: '─',
        bottom_left: '└',
        left: '│',
    };

    /// Rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top: '─',
        top_right: '╮',
        right: '│',
        bottom_right: '╯',
        bottom: '─',
        bottom_left: '╰',
        left: '│',
    };

    /// Heavy box drawing.
    pub const THICK: Self = Self {
        top_left: '┏',
        top: '━',
        top_right: '┓',
        right: '┃',
        bottom_right: '┛',
        bottom: '━',
        bottom_left: '┗',
        left: '┃',
    };

    /// Double-line box drawing.
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top: '═',
        top_right: '╗',
        right: '║',
        bottom_right: '╝',
        bottom: '═',
        bottom_left: '╚',
        left: '║',
    };

    /// Spaces: reserves the cells without drawing anything.
    pub const HIDDEN: Self = Self {
        top_left: ' ',
        top: ' ',
        top_right: ' ',
        right: ' ',
        bottom_right: ' ',
        bottom: ' ',
        bottom_left: ' ',
        left: ' ',
    };
}

bitflags! {
    /// Which sides of a border to draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Sides: u8 {
        /// Top edge.
        const TOP    = 0b0001;
        /// Right edge.
        const RIGHT  = 0b0010;
        /// Bottom edge.
        const BOTTOM = 0b0100;
        /// Left edge.
        const LEFT   = 0b1000;
        /// All four sides.
        const ALL    = 0b1111;
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_distinct_corners() {
        assert_ne!(Border::NORMAL.top_left, Border::ROUNDED.top_left);
        assert_ne!(Border::THICK.top, Border::DOUBLE.top);
    }

    #[test]
    fn sides_default_all() {
        let sides = Sides::default();
        assert!(sides.contains(Sides::TOP));
        assert!(sides.contains(Sides::LEFT));
        assert!(sides.contains(Sides::RIGHT));
        assert!(sides.contains(Sides::BOTTOM));
    }
}
