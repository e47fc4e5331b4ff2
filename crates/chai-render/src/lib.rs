#![forbid(unsafe_code)]

//! Frame presentation: ANSI sequence emitters and the line-diff renderer.

pub mod ansi;
pub mod renderer;

pub use renderer::Renderer;
