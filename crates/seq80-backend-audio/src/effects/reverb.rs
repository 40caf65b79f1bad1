//! Freeverb-style reverb effect.
//!
//! Each channel runs 8 parallel comb filters followed by 4 serial allpass
//! filters. The right channel's filters are offset by a few samples so a
//! stereo input decorrelates.

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};

use super::{check_range, check_sample_rate};

// Freeverb tuning constants (in samples at 44.1kHz)
const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;

const FIXED_GAIN: f64 = 0.015;
const SCALE_WET: f64 = 3.0;
const SCALE_DAMPING: f64 = 0.4;
const SCALE_ROOM: f64 = 0.28;
const OFFSET_ROOM: f64 = 0.7;

/// Seconds of tail appended per unit of decay.
const TAIL_SECONDS_PER_DECAY: f64 = 2.0;

/// Comb filter with damped feedback.
#[derive(Debug, Clone)]
struct CombFilter {
    buffer: Vec<f64>,
    buffer_index: usize,
    filter_store: f64,
    damp1: f64,
    damp2: f64,
    feedback: f64,
}

impl CombFilter {
    fn new(size: usize, feedback: f64, damping: f64) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            buffer_index: 0,
            filter_store: 0.0,
            damp1: damping,
            damp2: 1.0 - damping,
            feedback,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let output = self.buffer[self.buffer_index];

        // One-pole lowpass in the feedback path
        self.filter_store = (output * self.damp2) + (self.filter_store * self.damp1);

        self.buffer[self.buffer_index] = input + (self.filter_store * self.feedback);

        self.buffer_index += 1;
        if self.buffer_index >= self.buffer.len() {
            self.buffer_index = 0;
        }

        output
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filter_store = 0.0;
        self.buffer_index = 0;
    }
}

/// Schroeder allpass filter.
#[derive(Debug, Clone)]
struct AllpassFilter {
    buffer: Vec<f64>,
    buffer_index: usize,
}

impl AllpassFilter {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            buffer_index: 0,
        }
    }

    fn process(&mut self, input: f64) -> f64 {
        let buf_out = self.buffer[self.buffer_index];
        let output = buf_out - input;

        self.buffer[self.buffer_index] = input + (buf_out * 0.5);

        self.buffer_index += 1;
        if self.buffer_index >= self.buffer.len() {
            self.buffer_index = 0;
        }

        output
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.buffer_index = 0;
    }
}

/// One channel's comb bank and allpass chain.
#[derive(Debug, Clone)]
struct ReverbChannel {
    combs: Vec<CombFilter>,
    allpasses: Vec<AllpassFilter>,
}

impl ReverbChannel {
    fn new(scale: f64, spread: usize, feedback: f64, damping: f64) -> Self {
        let combs = COMB_TUNINGS
            .iter()
            .map(|&size| CombFilter::new(scaled(size + spread, scale), feedback, damping))
            .collect();
        let allpasses = ALLPASS_TUNINGS
            .iter()
            .map(|&size| AllpassFilter::new(scaled(size + spread, scale)))
            .collect();
        Self { combs, allpasses }
    }

    fn process(&mut self, input: f64) -> f64 {
        let input = input * FIXED_GAIN;
        let mut out: f64 = self.combs.iter_mut().map(|comb| comb.process(input)).sum();
        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }

    fn clear(&mut self) {
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}

fn scaled(size: usize, scale: f64) -> usize {
    (size as f64 * scale) as usize
}

/// Freeverb reverb processor.
#[derive(Debug, Clone)]
pub struct Reverb {
    mix: f64,
    tail: bool,
    tail_frames: usize,
    channels: [ReverbChannel; 2],
}

impl Reverb {
    /// Creates a reverb.
    ///
    /// # Arguments
    /// * `room_size` - Room size (0.0-1.0)
    /// * `damping` - High-frequency damping (0.0-1.0)
    /// * `decay` - Feedback scale, 0.0 up to but excluding 1.0
    /// * `mix` - Wet/dry mix (0.0-1.0)
    /// * `tail` - Append silence so the reverb can ring out
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        room_size: f64,
        damping: f64,
        decay: f64,
        mix: f64,
        tail: bool,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("reverb.room_size", room_size, 0.0, 1.0)?;
        check_range("reverb.damping", damping, 0.0, 1.0)?;
        if !(0.0..1.0).contains(&decay) {
            return Err(AudioError::invalid_param(
                "reverb.decay",
                format!("must be at least 0.0 and below 1.0, got {}", decay),
            ));
        }
        check_range("reverb.mix", mix, 0.0, 1.0)?;

        let sr = sample_rate as f64;
        let scale = sr / 44100.0;
        let feedback = decay * (room_size * SCALE_ROOM + OFFSET_ROOM);
        let damp = damping * SCALE_DAMPING;

        let longest_comb = scaled(COMB_TUNINGS[7] + STEREO_SPREAD, scale);
        let tail_frames = longest_comb + (TAIL_SECONDS_PER_DECAY * decay * sr).round() as usize;

        Ok(Self {
            mix,
            tail,
            tail_frames,
            channels: [
                ReverbChannel::new(scale, 0, feedback, damp),
                ReverbChannel::new(scale, STEREO_SPREAD, feedback, damp),
            ],
        })
    }

    /// Frames appended when the tail is enabled.
    pub fn tail_frames(&self) -> usize {
        self.tail_frames
    }

    /// Processes a buffer. With `mix == 0` the input is returned untouched.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        if self.mix == 0.0 {
            return buffer;
        }
        if self.tail {
            buffer.extend_silence(self.tail_frames);
        }

        let channels = buffer.channels() as usize;
        let dry = 1.0 - self.mix;
        let wet = self.mix * SCALE_WET;

        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            for (sample, channel) in frame.iter_mut().zip(self.channels.iter_mut()) {
                let reverbed = channel.process(*sample);
                *sample = *sample * dry + reverbed * wet;
            }
        }

        buffer
    }

    /// Clears all filter state.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(len: usize, sample_rate: u32) -> SampleBuffer {
        let mut samples = vec![0.0; len];
        samples[0] = 1.0;
        SampleBuffer::mono(samples, sample_rate)
    }

    #[test]
    fn test_rejects_unstable_decay() {
        for decay in [1.0, 1.2, -0.1, f64::NAN] {
            assert!(Reverb::new(0.5, 0.5, decay, 0.3, false, 44100).is_err());
        }
        assert!(Reverb::new(1.0, 0.0, 0.99, 0.3, false, 44100).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_params() {
        assert!(Reverb::new(1.5, 0.5, 0.5, 0.3, false, 44100).is_err());
        assert!(Reverb::new(0.5, -0.1, 0.5, 0.3, false, 44100).is_err());
        assert!(Reverb::new(0.5, 0.5, 0.5, 2.0, false, 44100).is_err());
    }

    #[test]
    fn test_zero_mix_is_identity() {
        let input = impulse(512, 44100);
        let mut reverb = Reverb::new(0.8, 0.5, 0.9, 0.0, true, 44100).unwrap();
        assert_eq!(reverb.process(input.clone()), input);
    }

    #[test]
    fn test_impulse_produces_tail_energy() {
        let mut reverb = Reverb::new(0.8, 0.5, 0.9, 0.5, false, 44100).unwrap();
        let out = reverb.process(impulse(8000, 44100));
        assert_eq!(out.frames(), 8000);
        let late_energy: f64 = out.samples()[2000..].iter().map(|s| s * s).sum();
        assert!(late_energy > 0.0);
        assert!(out.samples().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_tail_length() {
        let reverb = Reverb::new(0.5, 0.5, 0.5, 0.3, true, 44100).unwrap();
        // Longest right-channel comb plus one second at decay 0.5
        assert_eq!(reverb.tail_frames(), 1640 + 44100);

        let mut reverb = reverb;
        let out = reverb.process(impulse(100, 44100));
        assert_eq!(out.frames(), 100 + 1640 + 44100);
    }

    #[test]
    fn test_stereo_channels_decorrelate() {
        let mono = impulse(4000, 44100);
        let mut reverb = Reverb::new(0.7, 0.3, 0.8, 1.0, false, 44100).unwrap();
        let out = reverb.process(mono.into_stereo());
        let (left, right): (Vec<f64>, Vec<f64>) = out
            .samples()
            .chunks_exact(2)
            .map(|frame| (frame[0], frame[1]))
            .unzip();
        assert_ne!(left, right);
    }

    #[test]
    fn test_low_sample_rate_does_not_panic() {
        let mut reverb = Reverb::new(0.5, 0.5, 0.5, 0.5, false, 100).unwrap();
        let out = reverb.process(impulse(64, 100));
        assert_eq!(out.frames(), 64);
    }
}
