//! Sequence renderer.
//!
//! Walks a sequence step by step and writes one oscillator tone per note into
//! a single buffer. Timing is fixed to a whole number of samples per step, so
//! the playhead helpers in [`StepTiming`] agree exactly with the audio.

use std::ops::Range;

use seq80_spec::{RenderConfig, Sequence, Waveform};
use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::effects::EffectChain;
use crate::envelope::apply_envelope;
use crate::error::{AudioError, AudioResult};
use crate::oscillator::{oscillate, sample_count};
use crate::rng::derive_step_seed;

/// Sample-accurate step grid for one sequence at one sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    sample_rate: u32,
    step_samples: u64,
    steps: u32,
}

impl StepTiming {
    /// Computes the grid: `floor(sample_rate * 60 / (tempo * steps_per_beat))`
    /// samples per step, in integer arithmetic.
    ///
    /// Fails if the sample rate is too low to give every step a sample.
    pub fn new(sequence: &Sequence, sample_rate: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        let per_minute = sequence.tempo as u64 * sequence.steps_per_beat as u64;
        if per_minute == 0 {
            return Err(AudioError::invalid_param(
                "sequence.tempo",
                "tempo and steps_per_beat must be positive",
            ));
        }
        let step_samples = sample_rate as u64 * 60 / per_minute;
        if step_samples == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            sample_rate,
            step_samples,
            steps: sequence.steps,
        })
    }

    /// Samples (frames) per step.
    pub fn step_samples(&self) -> u64 {
        self.step_samples
    }

    /// Number of steps.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Sample rate the grid was computed for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total frames in a render.
    pub fn total_frames(&self) -> u64 {
        self.steps as u64 * self.step_samples
    }

    /// Step playing at frame `frame`, or `None` past the end.
    pub fn step_at_sample(&self, frame: u64) -> Option<u32> {
        let step = frame / self.step_samples;
        if step < self.steps as u64 {
            Some(step as u32)
        } else {
            None
        }
    }

    /// Frame range covered by `step`.
    pub fn sample_range(&self, step: u32) -> Range<u64> {
        let start = step as u64 * self.step_samples;
        start..start + self.step_samples
    }

    /// Start time of `step` in seconds.
    pub fn step_start_seconds(&self, step: u32) -> f64 {
        (step as u64 * self.step_samples) as f64 / self.sample_rate as f64
    }
}

/// Renders a sequence to a buffer without effects.
///
/// The sequence and config are validated first. Steps without a note are
/// silent; a note plays for its duration, clipped to its step.
///
/// # Errors
/// * Validation errors from the sequence, config or oscillator
/// * [`AudioError::Capacity`] if frames times channels exceeds the budget
pub fn render(sequence: &Sequence, config: &RenderConfig) -> AudioResult<SampleBuffer> {
    sequence.validate()?;
    config.validate()?;

    let sample_rate = config.sample_rate;
    let timing = StepTiming::new(sequence, sample_rate)?;
    let total_frames = timing.total_frames();
    let requested = total_frames.saturating_mul(config.channels as u64);
    let limit = config.budget.max_samples as u64;
    if requested > limit {
        return Err(AudioError::Capacity { requested, limit });
    }
    let frames = usize::try_from(total_frames)
        .map_err(|_| AudioError::Capacity { requested, limit })?;
    let step_samples = timing.step_samples() as usize;

    let mut samples = vec![0.0; frames];
    let step_seconds = sequence.step_duration_seconds();

    for note in &sequence.notes {
        let start = timing.sample_range(note.step).start as usize;
        let seconds = note.duration.to_seconds(step_seconds);
        let len = sample_count(seconds, sample_rate).min(step_samples);

        let mut tone = oscillate(
            note.frequency(),
            len,
            sample_rate,
            config.waveform,
            note.velocity * config.amplitude,
            derive_step_seed(config.seed, note.step),
        )?;
        apply_envelope(&mut tone, &config.envelope, sample_rate);
        samples[start..start + len].copy_from_slice(&tone);
    }

    debug!(
        sequence = %sequence.name,
        notes = sequence.notes.len(),
        frames,
        step_samples,
        sample_rate,
        channels = config.channels,
        waveform = config.waveform.as_str(),
        "rendered sequence"
    );

    let buffer = SampleBuffer::mono(samples, sample_rate);
    Ok(if config.channels == 2 {
        buffer.into_stereo()
    } else {
        buffer
    })
}

/// Renders with default settings apart from sample rate and waveform.
pub fn render_with_waveform(
    sequence: &Sequence,
    sample_rate: u32,
    waveform: Waveform,
) -> AudioResult<SampleBuffer> {
    let config = RenderConfig::default()
        .with_sample_rate(sample_rate)
        .with_waveform(waveform);
    render(sequence, &config)
}

/// Renders a sequence and runs it through the config's effect chain.
///
/// The chain is built, and so validated, before any audio is rendered.
pub fn render_with_effects(sequence: &Sequence, config: &RenderConfig) -> AudioResult<SampleBuffer> {
    let mut chain = EffectChain::from_specs(&config.effects, config.sample_rate)?;
    let buffer = render(sequence, config)?;
    Ok(apply_effects(buffer, &mut chain))
}

/// Runs a buffer through an effect chain.
pub fn apply_effects(buffer: SampleBuffer, chain: &mut EffectChain) -> SampleBuffer {
    if chain.is_empty() {
        return buffer;
    }
    debug!(effects = ?chain.names(), frames = buffer.frames(), "applying effect chain");
    chain.process(buffer)
}
