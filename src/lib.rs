//! Fruit Slicer - an ambient fruit-cutting animation
//!
//! Core modules:
//! - `sim`: Deterministic scene simulation (fruit lifecycle, blade, level meter)
//! - `renderer`: Display-list generation and Canvas 2D playback
//! - `audio`: Procedural ambient bed and slice transients
//! - `driver`: Frame clock and per-frame orchestration
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod color;
pub mod driver;
pub mod easing;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::FrameDriver;
pub use settings::Settings;

/// Animation configuration constants
pub mod consts {
    /// Frame delta clamp (seconds) so a stalled tab doesn't teleport fruit
    pub const MAX_FRAME_DT: f32 = 0.035;
    /// Seconds between fruit spawns
    pub const SPAWN_INTERVAL: f32 = 2.4;

    /// Lifecycle durations (seconds)
    pub const ENTER_DURATION: f32 = 1.4;
    pub const SLICE_DURATION: f32 = 0.75;
    pub const SETTLE_DURATION: f32 = 2.6;
    /// Exit age after which a fruit is removed
    pub const EXIT_LIFETIME: f32 = 4.0;

    /// Slice progress at which the blade and slice sound fire
    pub const SLICE_TRIGGER: f32 = 0.24;

    /// Fruit radius as a fraction of min(width, height)
    pub const FRUIT_RADIUS_FRACTION: f32 = 0.14;
    /// Radius jitter as a fraction of the base radius
    pub const FRUIT_RADIUS_JITTER: f32 = 0.3;
    /// Spawn offset below the bottom edge (css pixels)
    pub const SPAWN_DEPTH: f32 = 120.0;
    /// Mirrored split angle of the two halves (radians, ~69 degrees)
    pub const HALF_SPLIT_ANGLE: f32 = std::f32::consts::PI / 2.6;

    /// Blade travel angle (radians)
    pub const BLADE_ANGLE: f32 = std::f32::consts::PI / 3.4;
    /// Blade progress per second
    pub const BLADE_SPEED: f32 = 3.2;
    /// Blade deactivates once progress passes this
    pub const BLADE_END: f32 = 1.1;

    /// Decorative particle count
    pub const PARTICLE_COUNT: usize = 28;

    /// Slack for comparing accumulated frame time against durations
    pub const TIME_EPSILON: f32 = 1e-4;
}

/// Progress of `t` through a phase of length `duration`, clamped to [0, 1].
///
/// Ages within [`consts::TIME_EPSILON`] of the end count as complete, so
/// summing a fixed frame delta lands on the boundary regardless of rounding.
#[inline]
pub fn phase_progress(t: f32, duration: f32) -> f32 {
    if t + consts::TIME_EPSILON >= duration {
        1.0
    } else {
        (t / duration).clamp(0.0, 1.0)
    }
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
