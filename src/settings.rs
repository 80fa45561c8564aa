//! Animation settings
//!
//! Read once at startup from a JSON blob (the canvas `data-settings`
//! attribute in the browser, the first CLI argument natively). Nothing is
//! ever written back.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, PARTICLE_COUNT, SPAWN_INTERVAL};

/// Upper bound for an explicit particle count
pub const MAX_PARTICLES: usize = PARTICLE_COUNT * 8;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Ambient particle count for this preset
    pub fn particles(&self) -> usize {
        match self {
            QualityPreset::Low => PARTICLE_COUNT / 2,
            QualityPreset::Medium => PARTICLE_COUNT,
            QualityPreset::High => PARTICLE_COUNT * 2,
        }
    }
}

/// Animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Explicit particle count; overrides the preset
    pub particle_count: Option<usize>,

    // === Timing ===
    /// Seconds between fruit spawns
    pub spawn_interval: f32,
    /// Largest frame delta fed to the simulation (seconds)
    pub max_frame_dt: f32,
    /// RNG seed; wall clock when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Ambient bed gain (0.0 - 1.0)
    pub ambient_volume: f32,
    /// Slice transient peak gain (0.0 - 1.0)
    pub slice_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particle_count: None,

            spawn_interval: SPAWN_INTERVAL,
            max_frame_dt: MAX_FRAME_DT,
            seed: None,

            master_volume: 1.0,
            ambient_volume: 0.12,
            slice_volume: 0.4,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp every field into its usable range
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.spawn_interval.is_finite() && self.spawn_interval > 0.0) {
            self.spawn_interval = defaults.spawn_interval;
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            self.max_frame_dt = defaults.max_frame_dt;
        }
        self.master_volume = unit(self.master_volume);
        self.ambient_volume = unit(self.ambient_volume);
        self.slice_volume = unit(self.slice_volume);
        self.particle_count = self.particle_count.map(|n| n.min(MAX_PARTICLES));
        self
    }

    /// Effective particle count
    pub fn particles(&self) -> usize {
        self.particle_count.unwrap_or_else(|| self.quality.particles())
    }

    /// Load settings from the `data-settings` attribute of an element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(element: &web_sys::Element) -> Self {
        match element.get_attribute("data-settings") {
            Some(json) => {
                log::info!("Loaded settings from data-settings");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

fn unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
