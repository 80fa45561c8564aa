//! Per-frame simulation step
//!
//! Advances spawn timing, every fruit's lifecycle, the blade and the level
//! meter. Each fruit runs on its own age clock `t`, reset on every state
//! change, so fruits never depend on each other or on global time except for
//! the purely cosmetic settle wobble.

use rand::Rng;

use super::state::{BladeTrack, Fruit, Half, Lifecycle, SceneEvent, SceneState, SoundLevels};
use crate::consts::*;
use crate::easing::{ease_in_out_cubic, ease_out_cubic};
use crate::phase_progress;

/// Per-frame inputs from the host
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Viewport size in css pixels
    pub width: f32,
    pub height: f32,
    /// Host frame timestamp (ms); drives cosmetic oscillations only
    pub now_ms: f64,
    /// Seconds between spawns
    pub spawn_interval: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            now_ms: 0.0,
            spawn_interval: SPAWN_INTERVAL,
        }
    }
}

/// Rise height of the entry arc
const ENTER_ARC: f32 = 80.0;
/// Overshoot that eases out during entry
const ENTER_OVERSHOOT: f32 = 60.0;
/// Resting height as a fraction of the viewport
const REST_HEIGHT: f32 = 0.32;
/// Max vertical settle offset of each half
const SETTLE_DROP: f32 = 16.0;
const SETTLE_WOBBLE: f32 = 4.0;
const SETTLE_WOBBLE_PERIOD_MS: f64 = 450.0;
/// Separation of settled halves relative to the radius
const SETTLE_SPREAD: f32 = 0.45;
/// Exit drift speed (px/s)
const EXIT_DRIFT: f32 = 24.0;

/// Advance the scene by `dt` seconds
pub fn tick(state: &mut SceneState, input: &TickInput, dt: f32) {
    state.elapsed += dt;

    state.spawn_timer += dt;
    if state.spawn_timer > input.spawn_interval {
        state.spawn_timer = 0.0;
        state.spawn_fruit(input.width, input.height);
    }

    let SceneState {
        fruits,
        blade,
        events,
        ..
    } = state;
    for fruit in fruits.iter_mut() {
        advance_fruit(fruit, blade, events, input, dt);
    }
    fruits.retain(|fruit| {
        if fruit.expired() {
            log::debug!("fruit {} removed", fruit.id);
            events.push(SceneEvent::FruitRemoved { fruit_id: fruit.id });
            false
        } else {
            true
        }
    });

    state.blade.advance(dt);
    update_levels(&mut state.levels, &mut state.rng, input.now_ms);
}

/// Run one fruit's state machine for a frame
fn advance_fruit(
    fruit: &mut Fruit,
    blade: &mut BladeTrack,
    events: &mut Vec<SceneEvent>,
    input: &TickInput,
    dt: f32,
) {
    fruit.t += dt;
    // Exit has no fixed length; it never reaches 1
    let progress = fruit
        .state
        .duration()
        .map_or(0.0, |duration| phase_progress(fruit.t, duration));
    match fruit.state {
        Lifecycle::Enter => {
            fruit.pos.y = input.height * REST_HEIGHT
                - (progress * std::f32::consts::PI).sin() * ENTER_ARC
                + ease_out_cubic(1.0 - progress) * ENTER_OVERSHOOT;
            fruit.rotation += dt * 0.6;
        }
        Lifecycle::Slice => {
            fruit.slice_progress = ease_in_out_cubic(progress);
            if !fruit.slice_triggered && fruit.slice_progress > SLICE_TRIGGER {
                fruit.slice_triggered = true;
                log::debug!("fruit {} sliced at t={:.3}", fruit.id, fruit.t);
                blade.arm(fruit.pos, fruit.radius);
                events.push(SceneEvent::SliceTriggered {
                    fruit_id: fruit.id,
                    pos: fruit.pos,
                });
            }
        }
        Lifecycle::Settle => {
            let eased = ease_out_cubic(progress);
            let wobble_phase = input.now_ms / SETTLE_WOBBLE_PERIOD_MS;
            for (index, half) in fruit.halves.iter_mut().enumerate() {
                half.offset = eased * SETTLE_DROP * Half::direction(index)
                    + ((wobble_phase + index as f64).sin() as f32) * SETTLE_WOBBLE;
                half.separation = eased * fruit.radius * SETTLE_SPREAD;
            }
        }
        Lifecycle::Exit => {
            fruit.pos.y += dt * EXIT_DRIFT;
            fruit.rotation += dt * 0.3;
        }
    }
    if progress >= 1.0 {
        fruit.advance_state();
    }
}

/// Damped random walk toward a per-bar sine pulse
fn update_levels<R: Rng + ?Sized>(levels: &mut SoundLevels, rng: &mut R, now_ms: f64) {
    for (index, level) in levels.0.iter_mut().enumerate() {
        let period = 260.0 + index as f64 * 40.0;
        let pulse = (now_ms / period).sin().abs() as f32 * 12.0 + rng.random::<f32>() * 4.0;
        *level = *level * 0.6 + pulse * 0.4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(state: &mut SceneState, input: &mut TickInput, ticks: usize) {
        for _ in 0..ticks {
            input.now_ms += DT as f64 * 1000.0;
            tick(state, input, DT);
        }
    }

    /// Input that never auto-spawns during a test
    fn quiet_input() -> TickInput {
        TickInput {
            spawn_interval: f32::INFINITY,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_timer_fires() {
        let mut state = SceneState::new(1);
        let mut input = TickInput::default();
        // 2.4 s at 60 Hz is 144 ticks; the timer must strictly exceed it
        run(&mut state, &mut input, 144);
        assert!(state.fruits.len() <= 1);
        run(&mut state, &mut input, 2);
        assert_eq!(state.fruits.len(), 1);
        assert!(state.spawn_timer <= DT * 2.0 + 1e-6);
    }

    #[test]
    fn test_enter_to_slice_after_duration() {
        let mut state = SceneState::new(5);
        let mut input = quiet_input();
        state.spawn_fruit(input.width, input.height);

        run(&mut state, &mut input, 83);
        assert_eq!(state.fruits[0].state, Lifecycle::Enter);
        run(&mut state, &mut input, 1);
        assert_eq!(state.fruits[0].state, Lifecycle::Slice);
        assert_eq!(state.fruits[0].t, 0.0);
    }

    #[test]
    fn test_enter_rises_to_rest_height() {
        let mut state = SceneState::new(5);
        let mut input = quiet_input();
        state.spawn_fruit(input.width, input.height);
        run(&mut state, &mut input, 84);
        let rest = input.height * REST_HEIGHT;
        assert!((state.fruits[0].pos.y - rest).abs() < 1e-2);
    }

    #[test]
    fn test_slice_latch_fires_once() {
        let mut state = SceneState::new(9);
        let mut input = quiet_input();
        let id = state.spawn_fruit(input.width, input.height);
        state.drain_events();

        let mut triggers = 0;
        for _ in 0..(60 * 6) {
            run(&mut state, &mut input, 1);
            triggers += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, SceneEvent::SliceTriggered { fruit_id, .. } if *fruit_id == id))
                .count();
        }
        assert_eq!(triggers, 1);
    }

    #[test]
    fn test_slice_progress_frozen_through_settle() {
        let mut state = SceneState::new(2);
        let mut input = quiet_input();
        state.spawn_fruit(input.width, input.height);
        run(&mut state, &mut input, 84 + 45);
        let fruit = &state.fruits[0];
        assert_eq!(fruit.state, Lifecycle::Settle);
        assert_eq!(fruit.slice_progress, 1.0);

        run(&mut state, &mut input, 100);
        assert_eq!(state.fruits[0].slice_progress, 1.0);
    }

    #[test]
    fn test_settle_spreads_halves() {
        let mut state = SceneState::new(2);
        let mut input = quiet_input();
        state.spawn_fruit(input.width, input.height);
        run(&mut state, &mut input, 84 + 45 + 155);
        let fruit = &state.fruits[0];
        assert_eq!(fruit.state, Lifecycle::Settle);
        let spread = fruit.radius * SETTLE_SPREAD;
        for half in &fruit.halves {
            assert!(half.separation > spread * 0.99 && half.separation <= spread + 1e-3);
        }
        // Left half drops up, right half down, give or take the wobble
        assert!(fruit.halves[0].offset < fruit.halves[1].offset);
    }

    #[test]
    fn test_exit_removes_after_lifetime() {
        let mut state = SceneState::new(4);
        let mut input = quiet_input();
        let id = state.spawn_fruit(input.width, input.height);
        // enter + slice + settle
        run(&mut state, &mut input, 84 + 45 + 156);
        assert_eq!(state.fruits[0].state, Lifecycle::Exit);
        let y = state.fruits[0].pos.y;

        run(&mut state, &mut input, 239);
        assert_eq!(state.fruits.len(), 1);
        assert!(state.fruits[0].pos.y > y);

        run(&mut state, &mut input, 2);
        assert!(state.fruits.is_empty());
        assert!(
            state
                .drain_events()
                .contains(&SceneEvent::FruitRemoved { fruit_id: id })
        );
    }

    #[test]
    fn test_levels_stay_bounded() {
        let mut state = SceneState::new(11);
        let mut input = quiet_input();
        run(&mut state, &mut input, 600);
        for level in state.levels.0 {
            assert!((0.0..=16.0).contains(&level));
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = SceneState::new(99999);
        let mut state2 = SceneState::new(99999);
        let mut input1 = TickInput::default();
        let mut input2 = TickInput::default();

        run(&mut state1, &mut input1, 900);
        run(&mut state2, &mut input2, 900);

        assert_eq!(state1.fruits, state2.fruits);
        assert_eq!(state1.blade, state2.blade);
        assert_eq!(state1.levels, state2.levels);
    }
}
