//! Fruit construction

use glam::Vec2;
use rand::Rng;

use super::state::{Fruit, FruitKind, Half, Lifecycle, SceneEvent, SceneState};
use crate::consts::*;

/// Build a fresh fruit below a `width` x `height` viewport.
///
/// Kind is uniform over the palette, the radius is 14% of the short side
/// with +/-30% jitter, and `x` falls in the middle 40% of the width.
pub fn new_fruit<R: Rng + ?Sized>(rng: &mut R, id: u32, width: f32, height: f32) -> Fruit {
    let kind = FruitKind::ALL[rng.random_range(0..FruitKind::ALL.len())];
    let base_radius = width.min(height) * FRUIT_RADIUS_FRACTION;
    let variance = base_radius * FRUIT_RADIUS_JITTER;

    Fruit {
        id,
        kind,
        pos: Vec2::new(
            width * (0.3 + rng.random::<f32>() * 0.4),
            height + SPAWN_DEPTH,
        ),
        radius: base_radius + (rng.random::<f32>() * 2.0 - 1.0) * variance,
        rotation: rng.random::<f32>() * std::f32::consts::FRAC_PI_4,
        state: Lifecycle::Enter,
        t: 0.0,
        slice_progress: 0.0,
        slice_triggered: false,
        halves: [Half::new(-HALF_SPLIT_ANGLE), Half::new(HALF_SPLIT_ANGLE)],
    }
}

impl SceneState {
    /// Spawn a fruit and append it to the live collection, returning its id
    pub fn spawn_fruit(&mut self, width: f32, height: f32) -> u32 {
        let id = self.next_entity_id();
        let fruit = new_fruit(&mut self.rng, id, width, height);
        log::debug!(
            "spawned fruit {} ({}) r={:.1} at x={:.1}",
            id,
            fruit.kind.name(),
            fruit.radius,
            fruit.pos.x
        );
        self.events.push(SceneEvent::FruitSpawned {
            fruit_id: id,
            kind: fruit.kind,
        });
        self.fruits.push(fruit);
        id
    }
}
