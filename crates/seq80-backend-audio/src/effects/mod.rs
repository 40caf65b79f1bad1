//! Audio effects for post-processing rendered sequences.
//!
//! Every effect validates its parameters once, at construction, and then
//! processes buffers by value. Effects carry state (delay lines, filter
//! memory, LFO position) across calls until `reset`, so a long signal can be
//! fed in pieces. All effects handle mono and stereo buffers; stereo channels
//! keep independent state.

pub mod chain;
pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod delay_line;
pub mod distortion;
pub mod filter;
pub mod flanger;
pub mod reverb;
pub mod tremolo;

use std::f64::consts::PI;

use seq80_spec::EffectSpec;

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};

pub use chain::EffectChain;
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use delay::Delay;
pub use distortion::Distortion;
pub use filter::{BiquadCoeffs, BiquadFilter, Filter};
pub use flanger::Flanger;
pub use reverb::Reverb;
pub use tremolo::Tremolo;

const TWO_PI: f64 = 2.0 * PI;

/// A constructed, stateful effect.
#[derive(Debug, Clone)]
pub enum Effect {
    Delay(Delay),
    Reverb(Reverb),
    Chorus(Chorus),
    Flanger(Flanger),
    Distortion(Distortion),
    Filter(Filter),
    Compressor(Compressor),
    Tremolo(Tremolo),
}

impl Effect {
    /// Builds the processor described by `spec`, validating its parameters.
    pub fn from_spec(spec: &EffectSpec, sample_rate: u32) -> AudioResult<Self> {
        let effect = match *spec {
            EffectSpec::Delay {
                time_ms,
                feedback,
                mix,
                tail,
            } => Effect::Delay(Delay::new(time_ms, feedback, mix, tail, sample_rate)?),
            EffectSpec::Reverb {
                room_size,
                damping,
                decay,
                mix,
                tail,
            } => Effect::Reverb(Reverb::new(
                room_size,
                damping,
                decay,
                mix,
                tail,
                sample_rate,
            )?),
            EffectSpec::Chorus {
                rate_hz,
                depth_ms,
                mix,
            } => Effect::Chorus(Chorus::new(rate_hz, depth_ms, mix, sample_rate)?),
            EffectSpec::Flanger {
                rate_hz,
                depth_ms,
                feedback,
                mix,
            } => Effect::Flanger(Flanger::new(
                rate_hz,
                depth_ms,
                feedback,
                mix,
                sample_rate,
            )?),
            EffectSpec::Distortion {
                drive,
                curve,
                output_gain,
            } => Effect::Distortion(Distortion::new(drive, curve, output_gain)?),
            EffectSpec::Filter {
                mode,
                cutoff_hz,
                resonance,
            } => Effect::Filter(Filter::new(mode, cutoff_hz, resonance, sample_rate)?),
            EffectSpec::Compressor {
                threshold_db,
                ratio,
                attack_ms,
                release_ms,
                makeup_db,
            } => Effect::Compressor(Compressor::new(
                threshold_db,
                ratio,
                attack_ms,
                release_ms,
                makeup_db,
                sample_rate,
            )?),
            EffectSpec::Tremolo { rate_hz, depth } => {
                Effect::Tremolo(Tremolo::new(rate_hz, depth, sample_rate)?)
            }
        };
        Ok(effect)
    }

    /// Effect name, matching the `type` tag of its spec.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Delay(_) => "delay",
            Effect::Reverb(_) => "reverb",
            Effect::Chorus(_) => "chorus",
            Effect::Flanger(_) => "flanger",
            Effect::Distortion(_) => "distortion",
            Effect::Filter(_) => "filter",
            Effect::Compressor(_) => "compressor",
            Effect::Tremolo(_) => "tremolo",
        }
    }

    /// Processes a buffer.
    pub fn process(&mut self, buffer: SampleBuffer) -> SampleBuffer {
        match self {
            Effect::Delay(e) => e.process(buffer),
            Effect::Reverb(e) => e.process(buffer),
            Effect::Chorus(e) => e.process(buffer),
            Effect::Flanger(e) => e.process(buffer),
            Effect::Distortion(e) => e.process(buffer),
            Effect::Filter(e) => e.process(buffer),
            Effect::Compressor(e) => e.process(buffer),
            Effect::Tremolo(e) => e.process(buffer),
        }
    }

    /// Clears all internal state.
    pub fn reset(&mut self) {
        match self {
            Effect::Delay(e) => e.reset(),
            Effect::Reverb(e) => e.reset(),
            Effect::Chorus(e) => e.reset(),
            Effect::Flanger(e) => e.reset(),
            Effect::Distortion(e) => e.reset(),
            Effect::Filter(e) => e.reset(),
            Effect::Compressor(e) => e.reset(),
            Effect::Tremolo(e) => e.reset(),
        }
    }
}

/// Rejects values outside `min..=max`, including NaN.
pub(crate) fn check_range(name: &str, value: f64, min: f64, max: f64) -> AudioResult<()> {
    if !(min..=max).contains(&value) {
        return Err(AudioError::invalid_param(
            name,
            format!("must be {}-{}, got {}", min, max, value),
        ));
    }
    Ok(())
}

pub(crate) fn check_sample_rate(sample_rate: u32) -> AudioResult<()> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    Ok(())
}

/// Sine LFO value at `frame`. Channel 1 runs a quarter cycle ahead.
pub(crate) fn lfo(rate_hz: f64, frame: u64, sample_rate: f64, channel: usize) -> f64 {
    let t = frame as f64 / sample_rate;
    let offset = if channel == 1 { PI / 2.0 } else { 0.0 };
    (TWO_PI * rate_hz * t + offset).sin()
}
