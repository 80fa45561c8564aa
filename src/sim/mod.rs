//! Deterministic scene simulation
//!
//! All animation logic lives here. This module must stay pure:
//! - Caller-supplied frame delta only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod blade;
pub mod spawn;
pub mod state;
pub mod tick;

pub use spawn::new_fruit;
pub use state::{
    BladeTrack, Fruit, FruitKind, Half, LEVEL_BARS, Lifecycle, Palette, SceneEvent, SceneState,
    SoundLevels,
};
pub use tick::{TickInput, tick};
