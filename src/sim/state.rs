//! Scene state and core simulation types
//!
//! Everything the frame loop mutates lives in [`SceneState`]; the renderer
//! only ever reads it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Colors for one kind of fruit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: &'static str,
    pub highlight: &'static str,
    pub flesh: &'static str,
    /// Seed fill, already an `rgba(..)` string
    pub seeds: &'static str,
}

/// The fixed fruit palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FruitKind {
    Mango,
    Dragonfruit,
    Kiwi,
    Grapefruit,
    Blueberry,
}

impl FruitKind {
    pub const ALL: [FruitKind; 5] = [
        FruitKind::Mango,
        FruitKind::Dragonfruit,
        FruitKind::Kiwi,
        FruitKind::Grapefruit,
        FruitKind::Blueberry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FruitKind::Mango => "Mango",
            FruitKind::Dragonfruit => "Dragonfruit",
            FruitKind::Kiwi => "Kiwi",
            FruitKind::Grapefruit => "Grapefruit",
            FruitKind::Blueberry => "Blueberry",
        }
    }

    pub fn palette(&self) -> &'static Palette {
        match self {
            FruitKind::Mango => &Palette {
                base: "#ff9f54",
                highlight: "#ffd365",
                flesh: "#ffe17e",
                seeds: "rgba(226, 164, 42, 0.7)",
            },
            FruitKind::Dragonfruit => &Palette {
                base: "#ff477e",
                highlight: "#ff84c2",
                flesh: "#fef9ff",
                seeds: "rgba(12, 12, 12, 0.8)",
            },
            FruitKind::Kiwi => &Palette {
                base: "#8dc63f",
                highlight: "#b0ff6b",
                flesh: "#d8ffb6",
                seeds: "rgba(29, 60, 29, 0.8)",
            },
            FruitKind::Grapefruit => &Palette {
                base: "#ff7660",
                highlight: "#ffc2a1",
                flesh: "#ffe5dc",
                seeds: "rgba(238, 134, 119, 0.9)",
            },
            FruitKind::Blueberry => &Palette {
                base: "#5b6cff",
                highlight: "#a9b9ff",
                flesh: "#d8dcff",
                seeds: "rgba(49, 56, 110, 0.9)",
            },
        }
    }
}

/// Lifecycle of a fruit. Always visited in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Rising into view
    Enter,
    /// Being cut
    Slice,
    /// Halves falling apart
    Settle,
    /// Drifting off; removed after [`EXIT_LIFETIME`]
    Exit,
}

impl Lifecycle {
    /// Duration of this state, `None` for the open-ended exit drift
    pub fn duration(&self) -> Option<f32> {
        match self {
            Lifecycle::Enter => Some(ENTER_DURATION),
            Lifecycle::Slice => Some(SLICE_DURATION),
            Lifecycle::Settle => Some(SETTLE_DURATION),
            Lifecycle::Exit => None,
        }
    }

    pub fn next(&self) -> Option<Lifecycle> {
        match self {
            Lifecycle::Enter => Some(Lifecycle::Slice),
            Lifecycle::Slice => Some(Lifecycle::Settle),
            Lifecycle::Settle => Some(Lifecycle::Exit),
            Lifecycle::Exit => None,
        }
    }

    /// Whether the fruit is drawn as two halves
    pub fn is_cut(&self) -> bool {
        matches!(self, Lifecycle::Slice | Lifecycle::Settle)
    }
}

/// One half of a cut fruit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Half {
    /// Split angle (radians), fixed at spawn
    pub angle: f32,
    /// Vertical settle offset
    pub offset: f32,
    /// Horizontal separation from the center line
    pub separation: f32,
}

impl Half {
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            offset: 0.0,
            separation: 0.0,
        }
    }

    /// -1 for the left half, +1 for the right
    #[inline]
    pub fn direction(index: usize) -> f32 {
        if index == 0 { -1.0 } else { 1.0 }
    }
}

/// A fruit entity
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    /// Only used to desynchronize visual pulses
    pub id: u32,
    pub kind: FruitKind,
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub state: Lifecycle,
    /// Seconds in the current state
    pub t: f32,
    /// Cut animation progress, 0 before slicing and frozen once settled
    pub slice_progress: f32,
    /// One-shot latch for the blade/sound trigger
    pub slice_triggered: bool,
    pub halves: [Half; 2],
}

impl Fruit {
    /// Move to the next lifecycle state, resetting the age clock
    pub fn advance_state(&mut self) {
        if let Some(next) = self.state.next() {
            log::debug!("fruit {} ({}) {:?} -> {:?}", self.id, self.kind.name(), self.state, next);
            self.state = next;
            self.t = 0.0;
        }
    }

    /// Whether the exit drift has run its course
    pub fn expired(&self) -> bool {
        self.state == Lifecycle::Exit && self.t > EXIT_LIFETIME
    }
}

/// The transient slash drawn when a fruit is cut
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BladeTrack {
    pub active: bool,
    pub progress: f32,
    pub pos: Vec2,
    pub angle: f32,
    pub width: f32,
}

/// Number of bars in the decorative level meter
pub const LEVEL_BARS: usize = 5;

/// Decorative audio level bars shown by the page shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundLevels(pub [f32; LEVEL_BARS]);

impl Default for SoundLevels {
    fn default() -> Self {
        Self([2.0, 6.0, 12.0, 8.0, 4.0])
    }
}

impl SoundLevels {
    /// Bar heights in css pixels as the shell displays them
    pub fn display_heights(&self) -> [f32; LEVEL_BARS] {
        self.0.map(|level| level.clamp(6.0, 26.0))
    }
}

/// Something the simulation wants the outside world to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// A fruit spawned below the viewport
    FruitSpawned { fruit_id: u32, kind: FruitKind },
    /// A fruit crossed its slice threshold; play the cut sound
    SliceTriggered { fruit_id: u32, pos: Vec2 },
    /// A fruit finished its exit drift and was dropped
    FruitRemoved { fruit_id: u32 },
}

/// Complete scene state (deterministic for a given seed and frame sequence)
#[derive(Debug, Clone)]
pub struct SceneState {
    pub rng: Pcg32,
    /// Live fruits, oldest first (drawn back-to-front in this order)
    pub fruits: Vec<Fruit>,
    pub blade: BladeTrack,
    pub levels: SoundLevels,
    /// Seconds since the last spawn
    pub spawn_timer: f32,
    /// Simulated seconds elapsed
    pub elapsed: f32,
    /// Events raised since the last drain
    pub events: Vec<SceneEvent>,
    next_id: u32,
}

impl SceneState {
    /// Create an empty scene with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            fruits: Vec::new(),
            blade: BladeTrack::default(),
            levels: SoundLevels::default(),
            spawn_timer: 0.0,
            elapsed: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event raised since the previous call
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn fruit(&self, id: u32) -> Option<&Fruit> {
        self.fruits.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_order() {
        let mut state = Lifecycle::Enter;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            assert!(next > state);
            state = next;
            seen.push(state);
        }
        assert_eq!(
            seen,
            [Lifecycle::Enter, Lifecycle::Slice, Lifecycle::Settle, Lifecycle::Exit]
        );
        assert_eq!(Lifecycle::Exit.duration(), None);
    }

    #[test]
    fn test_palette_is_well_formed() {
        for kind in FruitKind::ALL {
            let p = kind.palette();
            for hex in [p.base, p.highlight, p.flesh] {
                assert!(crate::color::Rgb::parse_hex(hex).is_some(), "{} {}", kind.name(), hex);
            }
            assert!(p.seeds.starts_with("rgba("));
        }
    }

    #[test]
    fn test_level_display_clamp() {
        let levels = SoundLevels([0.0, 6.0, 12.0, 26.0, 40.0]);
        assert_eq!(levels.display_heights(), [6.0, 6.0, 12.0, 26.0, 26.0]);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = SceneState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
