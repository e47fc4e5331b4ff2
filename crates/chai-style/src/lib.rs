#![forbid(unsafe_code)]

//! Style: an immutable builder that turns a string into a measured,
//! decorated block.
//!
//! A [`Style`] is a plain record of optional attributes. Every setter
//! returns a modified copy, so styles can be shared, stored in app
//! state, and derived from one another without aliasing surprises.
//!
//! ```
//! use chai_style::{Border, Rgb, Style};
//!
//! let panel = Style::new()
//!     .bold()
//!     .fg(Rgb::new(250, 250, 250))
//!     .border(Border::ROUNDED)
//!     .padding((0, 1))
//!     .width(24);
//! let block = panel.render("All systems nominal");
//! ```
//!
//! Rendering is a fixed pipeline — wrap, align, height, clamp, color,
//! pad, border, margin — and the output is always rectangular: every
//! line has the same visible width.

pub mod border;
pub mod color;
pub mod style;

pub use border::{Border, Sides};
pub use color::Rgb;
pub use style::{Edges, Style, CENTER, LEFT, RIGHT};
