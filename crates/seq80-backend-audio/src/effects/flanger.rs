//! Flanger effect with LFO-modulated delay and feedback.
//!
//! Flanger is similar to chorus but uses a much shorter delay and a feedback
//! path, which gives the comb filter resonance its "jet" sound.

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};

use super::delay_line::DelayLine;
use super::{check_range, check_sample_rate, lfo};

/// Shortest delay of the sweep, in milliseconds.
pub const MIN_DELAY_MS: f64 = 1.0;

/// Feedback magnitude at and above which the flanger is rejected.
const FEEDBACK_LIMIT: f64 = 0.95;

/// Flanger: delay swept between [`MIN_DELAY_MS`] and `MIN_DELAY_MS + depth_ms`.
#[derive(Debug, Clone)]
pub struct Flanger {
    rate_hz: f64,
    depth_samples: f64,
    base_samples: f64,
    feedback: f64,
    mix: f64,
    sample_rate: f64,
    frame: u64,
    lines: [DelayLine; 2],
}

impl Flanger {
    /// Creates a flanger.
    ///
    /// # Arguments
    /// * `rate_hz` - LFO rate in Hz (0.0-10.0)
    /// * `depth_ms` - Sweep depth in milliseconds (0.0-10.0)
    /// * `feedback` - Feedback gain, strictly between -0.95 and 0.95
    /// * `mix` - Wet/dry mix (0.0-1.0)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        rate_hz: f64,
        depth_ms: f64,
        feedback: f64,
        mix: f64,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("flanger.rate_hz", rate_hz, 0.0, 10.0)?;
        check_range("flanger.depth_ms", depth_ms, 0.0, 10.0)?;
        if !feedback.is_finite() || feedback.abs() >= FEEDBACK_LIMIT {
            return Err(AudioError::invalid_param(
                "flanger.feedback",
                format!("must be between -0.95 and 0.95 (exclusive), got {}", feedback),
            ));
        }
        check_range("flanger.mix", mix, 0.0, 1.0)?;

        let sample_rate = sample_rate as f64;
        let base_samples = MIN_DELAY_MS / 1000.0 * sample_rate;
        let depth_samples = depth_ms / 1000.0 * sample_rate;
        let size = (base_samples + depth_samples).ceil() as usize + 3;

        Ok(Self {
            rate_hz,
            depth_samples,
            base_samples,
            feedback,
            mix,
            sample_rate,
            frame: 0,
            lines: [DelayLine::new(size), DelayLine::new(size)],
        })
    }

    /// Processes a buffer. The LFO continues across calls until [`reset`](Self::reset).
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        let channels = buffer.channels() as usize;
        let dry = 1.0 - self.mix;

        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            for (ch, (sample, line)) in frame.iter_mut().zip(self.lines.iter_mut()).enumerate() {
                let sweep = 0.5 + 0.5 * lfo(self.rate_hz, self.frame, self.sample_rate, ch);
                let delay = self.base_samples + self.depth_samples * sweep;
                let delayed = line.read_interpolated(delay);
                line.write(*sample + delayed * self.feedback);
                *sample = *sample * dry + delayed * self.mix;
            }
            self.frame += 1;
        }

        buffer
    }

    /// Clears the delay lines and rewinds the LFO.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unstable_feedback() {
        for fb in [0.95, -0.95, 1.0, -1.2, f64::NAN] {
            assert!(
                Flanger::new(0.5, 3.0, fb, 0.5, 44100).is_err(),
                "feedback {} accepted",
                fb
            );
        }
        assert!(Flanger::new(0.5, 3.0, -0.94, 0.5, 44100).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_params() {
        assert!(Flanger::new(11.0, 3.0, 0.5, 0.5, 44100).is_err());
        assert!(Flanger::new(0.5, 11.0, 0.5, 0.5, 44100).is_err());
        assert!(Flanger::new(0.5, 3.0, 0.5, 1.1, 44100).is_err());
    }

    #[test]
    fn test_feedback_decays() {
        let mut samples = vec![0.0; 44100];
        samples[0] = 1.0;
        let mut flanger = Flanger::new(0.3, 2.0, 0.9, 1.0, 44100).unwrap();
        let out = flanger.process(SampleBuffer::mono(samples, 44100));
        assert!(out.samples().iter().all(|s| s.is_finite()));
        let tail_peak = out.samples()[40000..]
            .iter()
            .fold(0.0_f64, |acc, s| acc.max(s.abs()));
        assert!(tail_peak < 0.01);
    }

    #[test]
    fn test_reset_repeats_output() {
        let input = SampleBuffer::mono((0..2000).map(|i| (i as f64 * 0.1).sin()).collect(), 44100);
        let mut flanger = Flanger::new(1.0, 4.0, 0.6, 0.5, 44100).unwrap();
        let first = flanger.process(input.clone());
        flanger.reset();
        let second = flanger.process(input);
        assert_eq!(first, second);
    }
}
