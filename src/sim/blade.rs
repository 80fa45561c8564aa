//! Blade trajectory
//!
//! Single slot: arming while a slash is still in flight overwrites it.

use glam::Vec2;

use super::state::BladeTrack;
use crate::consts::*;
use crate::direction;

/// Vertical lift of the blade anchor above the fruit center
pub const BLADE_LIFT: f32 = 30.0;
/// Blade width relative to the fruit radius
pub const BLADE_WIDTH_FACTOR: f32 = 2.6;
/// Travel speed in widths per second
pub const BLADE_TRAVEL: f32 = 3.0;

impl BladeTrack {
    /// Start a slash anchored just above a fruit
    pub fn arm(&mut self, fruit_pos: Vec2, fruit_radius: f32) {
        if self.active {
            log::debug!("blade re-armed mid-flight at progress {:.2}", self.progress);
        }
        *self = BladeTrack {
            active: true,
            progress: 0.0,
            pos: fruit_pos - Vec2::new(0.0, BLADE_LIFT),
            angle: BLADE_ANGLE,
            width: fruit_radius * BLADE_WIDTH_FACTOR,
        };
    }

    /// Advance an in-flight slash; no-op when idle
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.progress += dt * BLADE_SPEED;
        self.pos += direction(self.angle) * self.width * dt * BLADE_TRAVEL;
        if self.progress > BLADE_END {
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_sets_trajectory() {
        let mut blade = BladeTrack::default();
        blade.arm(Vec2::new(100.0, 200.0), 50.0);
        assert!(blade.active);
        assert_eq!(blade.progress, 0.0);
        assert_eq!(blade.pos, Vec2::new(100.0, 170.0));
        assert_eq!(blade.angle, BLADE_ANGLE);
        assert!((blade.width - 130.0).abs() < 1e-3);
    }

    #[test]
    fn test_idle_blade_does_not_move() {
        let mut blade = BladeTrack::default();
        blade.advance(0.5);
        assert_eq!(blade, BladeTrack::default());
    }

    #[test]
    fn test_blade_travels_down_and_right() {
        let mut blade = BladeTrack::default();
        blade.arm(Vec2::ZERO, 10.0);
        let start = blade.pos;
        blade.advance(1.0 / 60.0);
        assert!(blade.pos.x > start.x);
        assert!(blade.pos.y > start.y);
    }

    #[test]
    fn test_blade_deactivates_after_end() {
        let mut blade = BladeTrack::default();
        blade.arm(Vec2::ZERO, 10.0);
        let mut frames = 0;
        while blade.active {
            blade.advance(1.0 / 60.0);
            frames += 1;
            assert!(frames < 100);
        }
        // 1.1 / 3.2 s at 60 Hz
        assert_eq!(frames, 21);
        assert!(blade.progress > BLADE_END);
    }

    #[test]
    fn test_rearm_overwrites_in_flight() {
        let mut blade = BladeTrack::default();
        blade.arm(Vec2::new(10.0, 10.0), 10.0);
        for _ in 0..10 {
            blade.advance(1.0 / 60.0);
        }
        blade.arm(Vec2::new(300.0, 300.0), 40.0);
        assert_eq!(blade.progress, 0.0);
        assert_eq!(blade.pos, Vec2::new(300.0, 270.0));
        assert!((blade.width - 104.0).abs() < 1e-3);
    }
}
