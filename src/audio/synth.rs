//! Procedural sample buffers
//!
//! Both sounds are rendered up front into plain `f32` buffers; the playback
//! layer only wires them into filter and gain nodes.

use std::f32::consts::PI;

use rand::Rng;

/// Length of the looping ambient bed (seconds)
pub const AMBIENT_SECONDS: f32 = 4.0;
/// Peak amplitude of the ambient noise before filtering
pub const AMBIENT_AMPLITUDE: f32 = 0.6;
/// Low-pass cutoff and resonance for the ambient bed
pub const AMBIENT_CUTOFF_HZ: f32 = 480.0;
pub const AMBIENT_Q: f32 = 0.7;
/// Cutoff modulation: LFO rate and depth (Hz)
pub const AMBIENT_LFO_HZ: f32 = 0.2;
pub const AMBIENT_LFO_DEPTH_HZ: f32 = 180.0;

/// Length of one slice transient (seconds)
pub const SLICE_SECONDS: f32 = 0.45;
/// Carrier, vibrato rate and vibrato depth of the slice tone
pub const SLICE_TONE_HZ: f32 = 920.0;
pub const SLICE_VIBRATO_RATE: f32 = 12.0;
pub const SLICE_VIBRATO_HZ: f32 = 40.0;
pub const SLICE_HIGHPASS_HZ: f32 = 420.0;
/// Gain envelope: attack time and the floor exponential ramps start/end at
pub const SLICE_ATTACK: f64 = 0.03;
pub const GAIN_FLOOR: f32 = 0.0001;

fn buffer_len(sample_rate: f32, seconds: f32) -> usize {
    (sample_rate.max(0.0) * seconds).round() as usize
}

/// White noise in [-1, 1)
#[inline]
fn noise<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random::<f32>() * 2.0 - 1.0
}

/// Decaying noise for the ambient loop: `noise * (1 - i/n)^1.5 * 0.6`
pub fn ambient_bed<R: Rng + ?Sized>(rng: &mut R, sample_rate: f32) -> Vec<f32> {
    let len = buffer_len(sample_rate, AMBIENT_SECONDS);
    (0..len)
        .map(|i| {
            let fade = (1.0 - i as f32 / len as f32).powf(1.5);
            noise(rng) * fade * AMBIENT_AMPLITUDE
        })
        .collect()
}

/// Bell-shaped envelope over normalized time `x` in [0, 1]
#[inline]
pub fn slice_envelope(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    (1.0 - x).powf(1.5) * (PI * x).sin()
}

/// Noise plus a wobbling 920 Hz tone, shaped by [`slice_envelope`]
pub fn slice_transient<R: Rng + ?Sized>(rng: &mut R, sample_rate: f32) -> Vec<f32> {
    let len = buffer_len(sample_rate, SLICE_SECONDS);
    (0..len)
        .map(|i| {
            let time = i as f32 / sample_rate;
            let envelope = slice_envelope(time / SLICE_SECONDS);
            let freq = SLICE_TONE_HZ + (time * SLICE_VIBRATO_RATE).sin() * SLICE_VIBRATO_HZ;
            let tone = (2.0 * PI * freq * time).sin() * 0.4;
            (noise(rng) * 0.4 + tone) * envelope
        })
        .collect()
}
