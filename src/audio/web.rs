//! Web Audio playback
//!
//! Best effort throughout: a missing or suspended context just means silence.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, BiquadFilterNode,
    BiquadFilterType, GainNode,
};

use super::synth::*;
use crate::settings::Settings;
use crate::sim::SceneEvent;

/// Audio manager for the scene
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Output gain of the ambient loop once it is running
    ambient: Option<GainNode>,
    rng: Pcg32,
    master_volume: f32,
    ambient_volume: f32,
    slice_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            ctx: None,
            ambient: None,
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed_a0d1),
            master_volume: settings.master_volume,
            ambient_volume: settings.ambient_volume,
            slice_volume: settings.slice_volume,
            muted: settings.muted,
        }
    }

    /// Create/resume the context and start the ambient bed.
    ///
    /// Must be called from a user gesture handler.
    pub fn activate(&mut self) {
        if self.ctx.is_none() {
            // May fail outside a secure context
            self.ctx = AudioContext::new().ok();
            if self.ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
                return;
            }
        }
        let Some(ctx) = self.ctx.clone() else { return };

        if ctx.state() == AudioContextState::Suspended {
            resume(&ctx);
        }

        if self.ambient.is_none() {
            self.ambient = self.start_ambient(&ctx);
            if self.ambient.is_some() {
                log::info!("Ambient bed started");
            } else {
                log::warn!("Failed to build ambient graph");
            }
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(gain) = &self.ambient {
            gain.gain().set_value(self.ambient_volume * self.effective_volume());
        }
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// React to a simulation event
    pub fn handle(&mut self, event: &SceneEvent) {
        if let SceneEvent::SliceTriggered { .. } = event {
            self.play_slice();
        }
    }

    /// Render and play one slice transient
    pub fn play_slice(&mut self) {
        let vol = self.effective_volume() * self.slice_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };
        if ctx.state() != AudioContextState::Running {
            return;
        }

        let samples = slice_transient(&mut self.rng, ctx.sample_rate());
        if self.play_transient(&ctx, samples, vol).is_none() {
            log::warn!("Slice sound dropped");
        }
    }

    /// Close the context, releasing every node
    pub fn close(&mut self) {
        self.ambient = None;
        if let Some(ctx) = self.ctx.take() {
            if let Ok(promise) = ctx.close() {
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = JsFuture::from(promise).await;
                });
            }
            log::info!("Audio context closed");
        }
    }

    // === Graph builders ===

    /// Fill a mono buffer with pre-rendered samples
    fn mono_buffer(ctx: &AudioContext, mut samples: Vec<f32>) -> Option<AudioBuffer> {
        if samples.is_empty() {
            return None;
        }
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, ctx.sample_rate())
            .ok()?;
        buffer.copy_to_channel(&mut samples, 0).ok()?;
        Some(buffer)
    }

    fn buffer_source(ctx: &AudioContext, buffer: &AudioBuffer) -> Option<AudioBufferSourceNode> {
        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(buffer));
        Some(source)
    }

    fn filter(ctx: &AudioContext, kind: BiquadFilterType, freq: f32) -> Option<BiquadFilterNode> {
        let filter = ctx.create_biquad_filter().ok()?;
        filter.set_type(kind);
        filter.frequency().set_value(freq);
        Some(filter)
    }

    /// noise loop -> LFO-swept low-pass -> gain -> out
    fn start_ambient(&mut self, ctx: &AudioContext) -> Option<GainNode> {
        let samples = ambient_bed(&mut self.rng, ctx.sample_rate());
        let buffer = Self::mono_buffer(ctx, samples)?;
        let source = Self::buffer_source(ctx, &buffer)?;
        source.set_loop(true);

        let lowpass = Self::filter(ctx, BiquadFilterType::Lowpass, AMBIENT_CUTOFF_HZ)?;
        lowpass.q().set_value(AMBIENT_Q);

        let lfo = ctx.create_oscillator().ok()?;
        lfo.frequency().set_value(AMBIENT_LFO_HZ);
        let lfo_depth = ctx.create_gain().ok()?;
        lfo_depth.gain().set_value(AMBIENT_LFO_DEPTH_HZ);
        lfo.connect_with_audio_node(&lfo_depth).ok()?;
        lfo_depth.connect_with_audio_param(&lowpass.frequency()).ok()?;
        lfo.start().ok()?;

        let gain = ctx.create_gain().ok()?;
        gain.gain()
            .set_value(self.ambient_volume * self.effective_volume());

        source.connect_with_audio_node(&lowpass).ok()?;
        lowpass.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start_with_when(0.0).ok()?;
        Some(gain)
    }

    /// transient -> high-pass -> exponential swell/decay -> out
    fn play_transient(&self, ctx: &AudioContext, samples: Vec<f32>, peak: f32) -> Option<()> {
        let buffer = Self::mono_buffer(ctx, samples)?;
        let source = Self::buffer_source(ctx, &buffer)?;
        let highpass = Self::filter(ctx, BiquadFilterType::Highpass, SLICE_HIGHPASS_HZ)?;

        let gain = ctx.create_gain().ok()?;
        let t = ctx.current_time();
        gain.gain().set_value_at_time(GAIN_FLOOR, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(peak.max(GAIN_FLOOR), t + SLICE_ATTACK)
            .ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(GAIN_FLOOR, t + SLICE_SECONDS as f64)
            .ok()?;

        source.connect_with_audio_node(&highpass).ok()?;
        highpass.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        source.start().ok()?;
        Some(())
    }
}

/// Resume a suspended context in the background
fn resume(ctx: &AudioContext) {
    match ctx.resume() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("AudioContext resume rejected: {:?}", e);
            }
        }),
        Err(e) => log::warn!("AudioContext resume failed: {:?}", e),
    }
}
