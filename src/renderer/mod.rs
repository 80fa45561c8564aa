//! Canvas 2D rendering module
//!
//! `scene` builds a display list from the simulation state; `canvas` plays it
//! back in the browser.

pub mod commands;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use commands::{Composite, DisplayList, DrawCommand, Paint, PathOp, Viewport};
pub use scene::render_scene;
