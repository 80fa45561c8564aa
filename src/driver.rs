//! Frame driver
//!
//! Owns the animation clock: turns host frame timestamps into clamped deltas,
//! steps the simulation and builds the frame's display list. One call to
//! [`FrameDriver::frame`] is one atomic simulation + render step.

use crate::renderer::{DisplayList, Viewport, render_scene};
use crate::settings::Settings;
use crate::sim::{LEVEL_BARS, SceneEvent, SceneState, TickInput, tick};

/// Output of a single frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Simulation events raised this frame (slice triggers etc.)
    pub events: Vec<SceneEvent>,
    /// What to draw
    pub display: DisplayList,
    /// Delta time the simulation was advanced by (seconds)
    pub dt: f32,
}

pub struct FrameDriver {
    state: SceneState,
    settings: Settings,
    viewport: Viewport,
    /// Timestamp of the previous frame; `None` right after (re)starting
    last_time: Option<f64>,
    /// Most recent host timestamp (ms)
    now_ms: f64,
    playing: bool,
    frames: u64,
}

impl FrameDriver {
    /// Settings are sanitized here; hand-built values may be out of range
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            state: SceneState::new(seed),
            settings: settings.sanitized(),
            viewport: Viewport::new(0.0, 0.0),
            last_time: None,
            now_ms: 0.0,
            playing: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Viewport size in css pixels; called by the shell on resize
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start (or resume) playback; the next frame has zero delta
    pub fn play(&mut self) {
        if !self.playing {
            log::info!("Playback started");
        }
        self.playing = true;
        self.last_time = None;
    }

    /// Stop advancing; the scene is frozen where it is
    pub fn pause(&mut self) {
        if self.playing {
            log::info!("Playback paused after {} frames", self.frames);
        }
        self.playing = false;
        self.last_time = None;
    }

    /// Seconds since the previous frame, clamped to `max_frame_dt`
    fn frame_delta(&mut self, timestamp_ms: f64) -> f32 {
        let last = self.last_time.replace(timestamp_ms).unwrap_or(timestamp_ms);
        let dt = ((timestamp_ms - last) / 1000.0) as f32;
        dt.max(0.0).min(self.settings.max_frame_dt)
    }

    /// Advance the simulation to `timestamp_ms`, returning raised events
    pub fn advance(&mut self, timestamp_ms: f64) -> (f32, Vec<SceneEvent>) {
        if !self.playing {
            return (0.0, Vec::new());
        }
        let dt = self.frame_delta(timestamp_ms);
        self.now_ms = timestamp_ms;

        let input = TickInput {
            width: self.viewport.width,
            height: self.viewport.height,
            now_ms: timestamp_ms,
            spawn_interval: self.settings.spawn_interval,
        };
        tick(&mut self.state, &input, dt);
        self.frames += 1;
        (dt, self.state.drain_events())
    }

    /// Display list for the current state
    pub fn render(&self) -> DisplayList {
        render_scene(
            &self.state,
            self.now_ms,
            self.viewport,
            self.settings.particles(),
        )
    }

    /// Advance and render in one step
    pub fn frame(&mut self, timestamp_ms: f64) -> Frame {
        let (dt, events) = self.advance(timestamp_ms);
        Frame {
            events,
            display: self.render(),
            dt,
        }
    }

    /// Level meter values for the shell
    pub fn sound_levels(&self) -> [f32; LEVEL_BARS] {
        self.state.levels.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DT: f32 = crate::consts::MAX_FRAME_DT;

    fn driver() -> FrameDriver {
        let mut d = FrameDriver::new(Settings::default(), 1);
        d.set_viewport(800.0, 600.0);
        d
    }

    #[test]
    fn test_paused_driver_does_nothing() {
        let mut d = driver();
        let (dt, events) = d.advance(1000.0);
        assert_eq!(dt, 0.0);
        assert!(events.is_empty());
        assert_eq!(d.frames(), 0);
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut d = driver();
        d.play();
        assert_eq!(d.advance(5000.0).0, 0.0);
        let (dt, _) = d.advance(5016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_delta_clamped() {
        let mut d = driver();
        d.play();
        d.advance(0.0);
        assert_eq!(d.advance(2000.0).0, MAX_DT);
        // Clock going backwards never rewinds the scene
        assert_eq!(d.advance(1000.0).0, 0.0);
    }

    #[test]
    fn test_bad_frame_clamp_never_panics() {
        for max_frame_dt in [-0.01, f32::NAN, 0.0] {
            let settings = Settings {
                max_frame_dt,
                ..Default::default()
            };
            let mut d = FrameDriver::new(settings, 1);
            d.set_viewport(800.0, 600.0);
            d.play();
            d.advance(0.0);
            let (dt, _) = d.advance(16.0);
            assert!((dt - 0.016).abs() < 1e-6);
            assert_eq!(d.advance(5000.0).0, MAX_DT);
        }
    }

    #[test]
    fn test_pause_resets_clock() {
        let mut d = driver();
        d.play();
        d.advance(0.0);
        d.advance(16.0);
        d.pause();
        d.play();
        // A long pause doesn't show up as one huge step
        assert_eq!(d.advance(60_000.0).0, 0.0);
    }

    #[test]
    fn test_frame_renders_every_tick() {
        let mut d = driver();
        d.play();
        let frame = d.frame(0.0);
        assert!(!frame.display.is_empty());
        assert_eq!(d.frames(), 1);
    }
}
