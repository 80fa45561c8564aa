//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Canvas backing-store sizing (device pixel ratio)
//! - Locating the drawing surface
//! - Page lifecycle (begin, hide, back/forward cache restore)
//! - Setup failures that leave the animation inert

use thiserror::Error;

use crate::renderer::Viewport;

/// Reasons the animation cannot start. None of these are fatal to the page;
/// the bootstrap logs them and stays inert.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no canvas element with id `{0}`")]
    NoCanvas(String),
    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),
    #[error("2D context unavailable")]
    NoContext,
}

/// Canvas size in css pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl CanvasSize {
    /// Non-positive or missing ratios fall back to 1
    pub fn new(css_width: f64, css_height: f64, dpr: f64) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            dpr,
        }
    }

    /// Backing store size in device pixels
    pub fn backing(&self) -> (u32, u32) {
        (
            (self.css_width * self.dpr).round() as u32,
            (self.css_height * self.dpr).round() as u32,
        )
    }

    /// Logical drawing area the scene is laid out in
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.css_width as f32, self.css_height as f32)
    }
}

/// Shell playback state across Begin, hide and back/forward cache restores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Begin has been pressed
    pub started: bool,
    /// An audio context is open (or being opened)
    pub audio_open: bool,
}

impl PageState {
    /// Returns false if playback had already begun
    pub fn begin(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.audio_open = true;
        true
    }

    /// The page is being hidden and its audio context closed
    pub fn page_hidden(&mut self) {
        self.audio_open = false;
    }

    /// The page is shown again; returns true if audio must be reopened.
    /// Only a restore from the back/forward cache keeps the old session.
    pub fn page_shown(&mut self, persisted: bool) -> bool {
        if !(persisted && self.started && !self.audio_open) {
            return false;
        }
        self.audio_open = true;
        true
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    //! Browser surface helpers

    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

    use super::{CanvasSize, PlatformError};

    pub fn window() -> Result<Window, PlatformError> {
        web_sys::window().ok_or(PlatformError::NoWindow)
    }

    pub fn document() -> Result<Document, PlatformError> {
        window()?.document().ok_or(PlatformError::NoDocument)
    }

    pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, PlatformError> {
        document()?
            .get_element_by_id(id)
            .ok_or_else(|| PlatformError::NoCanvas(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PlatformError::NotACanvas(id.to_string()))
    }

    pub fn context_2d(
        canvas: &HtmlCanvasElement,
    ) -> Result<CanvasRenderingContext2d, PlatformError> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(PlatformError::NoContext)
    }

    /// Current size of the canvas' parent (or the canvas itself)
    pub fn measure(canvas: &HtmlCanvasElement) -> CanvasSize {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let rect = match canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect(),
            None => canvas.get_bounding_client_rect(),
        };
        CanvasSize::new(rect.width(), rect.height(), dpr)
    }

    /// Resize the backing store and scale the context so the scene can draw
    /// in css pixels
    pub fn resize_canvas(
        canvas: &HtmlCanvasElement,
        ctx: &CanvasRenderingContext2d,
    ) -> CanvasSize {
        let size = measure(canvas);
        let (w, h) = size.backing();
        canvas.set_width(w);
        canvas.set_height(h);
        // Resizing resets the transform, so this never compounds
        if let Err(e) = ctx.set_transform(size.dpr, 0.0, 0.0, size.dpr, 0.0, 0.0) {
            log::warn!("Failed to scale canvas: {:?}", e);
        }
        log::info!(
            "Canvas resized to {}x{} css px (dpr {})",
            size.css_width,
            size.css_height,
            size.dpr
        );
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_scales_by_dpr() {
        let size = CanvasSize::new(400.0, 300.0, 2.0);
        assert_eq!(size.backing(), (800, 600));
        assert_eq!(size.viewport(), Viewport::new(400.0, 300.0));
    }

    #[test]
    fn test_bad_dpr_defaults_to_one() {
        assert_eq!(CanvasSize::new(10.0, 10.0, 0.0).dpr, 1.0);
        assert_eq!(CanvasSize::new(10.0, 10.0, f64::NAN).dpr, 1.0);
    }

    #[test]
    fn test_begin_only_once() {
        let mut page = PageState::default();
        assert!(page.begin());
        assert!(!page.begin());
        assert!(page.audio_open);
    }

    #[test]
    fn test_cache_restore_reopens_audio() {
        let mut page = PageState::default();
        page.begin();
        page.page_hidden();
        assert!(!page.audio_open);
        assert!(page.page_shown(true));
        assert!(page.audio_open);
        // Already open again
        assert!(!page.page_shown(true));
    }

    #[test]
    fn test_show_without_restore_leaves_audio_closed() {
        let mut page = PageState::default();
        assert!(!page.page_shown(true));
        page.begin();
        page.page_hidden();
        assert!(!page.page_shown(false));
        assert!(!page.audio_open);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlatformError::NoCanvas("stage".into()).to_string(),
            "no canvas element with id `stage`"
        );
    }
}
