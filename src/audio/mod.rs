//! Audio synthesis using the Web Audio API
//!
//! Procedurally generated ambience and slice sounds - no external files needed!
//! Sample generation in `synth` is platform independent; `web` plays the
//! buffers in the browser.

pub mod synth;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use synth::{ambient_bed, slice_envelope, slice_transient};
#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;
