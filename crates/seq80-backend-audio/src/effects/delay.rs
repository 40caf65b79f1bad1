//! Feedback delay with an optional decay tail.

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};

use super::delay_line::DelayLine;
use super::{check_range, check_sample_rate};

/// Longest tail the delay will append, in seconds.
const MAX_TAIL_SECONDS: f64 = 10.0;

/// Echo level, relative to the first repeat, at which the tail is cut (-60 dB).
const TAIL_FLOOR: f64 = 0.001;

/// Feedback delay line effect.
#[derive(Debug, Clone)]
pub struct Delay {
    feedback: f64,
    mix: f64,
    tail: bool,
    delay_samples: f64,
    sample_rate: f64,
    lines: [DelayLine; 2],
}

impl Delay {
    /// Creates a delay.
    ///
    /// # Arguments
    /// * `time_ms` - Delay time in milliseconds (1-2000)
    /// * `feedback` - Feedback gain, 0.0 up to but excluding 0.95
    /// * `mix` - Wet/dry mix (0.0-1.0)
    /// * `tail` - Append enough silence for the echoes to decay
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        time_ms: f64,
        feedback: f64,
        mix: f64,
        tail: bool,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("delay.time_ms", time_ms, 1.0, 2000.0)?;
        if !(0.0..0.95).contains(&feedback) {
            return Err(AudioError::invalid_param(
                "delay.feedback",
                format!("must be at least 0.0 and below 0.95, got {}", feedback),
            ));
        }
        check_range("delay.mix", mix, 0.0, 1.0)?;

        let sample_rate = sample_rate as f64;
        let delay_samples = time_ms / 1000.0 * sample_rate;
        let size = delay_samples.ceil() as usize + 2;

        Ok(Self {
            feedback,
            mix,
            tail,
            delay_samples,
            sample_rate,
            lines: [DelayLine::new(size), DelayLine::new(size)],
        })
    }

    /// Frames appended when the tail is enabled.
    ///
    /// Enough delay periods for the feedback to fall below -60 dB, capped at
    /// ten seconds. Without feedback this is a single period.
    pub fn tail_frames(&self) -> usize {
        let repeats = if self.feedback > 0.0 {
            (TAIL_FLOOR.ln() / self.feedback.ln()).ceil().max(1.0)
        } else {
            1.0
        };
        let frames = (self.delay_samples * repeats).ceil();
        frames.min(MAX_TAIL_SECONDS * self.sample_rate) as usize
    }

    /// Processes a buffer. With `mix == 0` the input is returned untouched.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        if self.mix == 0.0 {
            return buffer;
        }
        if self.tail {
            buffer.extend_silence(self.tail_frames());
        }

        let channels = buffer.channels() as usize;
        let dry = 1.0 - self.mix;

        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            for (sample, line) in frame.iter_mut().zip(self.lines.iter_mut()) {
                let delayed = line.read_interpolated(self.delay_samples);
                line.write(*sample + delayed * self.feedback);
                *sample = *sample * dry + delayed * self.mix;
            }
        }

        buffer
    }

    /// Clears both delay lines.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse(len: usize) -> SampleBuffer {
        let mut samples = vec![0.0; len];
        samples[0] = 1.0;
        SampleBuffer::mono(samples, 1000)
    }

    #[test]
    fn test_rejects_unstable_feedback() {
        for fb in [0.95, 1.0, 1.5, -0.1, f64::NAN] {
            assert!(
                Delay::new(100.0, fb, 0.5, false, 44100).is_err(),
                "feedback {} accepted",
                fb
            );
        }
        assert!(Delay::new(100.0, 0.94, 0.5, false, 44100).is_ok());
    }

    #[test]
    fn test_rejects_bad_time_and_mix() {
        assert!(Delay::new(0.5, 0.3, 0.5, false, 44100).is_err());
        assert!(Delay::new(2500.0, 0.3, 0.5, false, 44100).is_err());
        assert!(Delay::new(100.0, 0.3, 1.5, false, 44100).is_err());
        assert!(Delay::new(100.0, 0.3, 0.5, false, 0).is_err());
    }

    #[test]
    fn test_echo_position_and_feedback() {
        // 10 ms at 1 kHz is 10 samples
        let mut delay = Delay::new(10.0, 0.5, 1.0, false, 1000).unwrap();
        let out = delay.process(impulse(40));
        let s = out.samples();
        assert_eq!(s[0], 0.0);
        assert!((s[10] - 1.0).abs() < 1e-12);
        assert!((s[20] - 0.5).abs() < 1e-12);
        assert!((s[30] - 0.25).abs() < 1e-12);
        assert_eq!(out.frames(), 40);
    }

    #[test]
    fn test_zero_mix_is_identity() {
        let input = SampleBuffer::mono((0..64).map(|i| (i as f64 * 0.1).sin()).collect(), 1000);
        let mut delay = Delay::new(10.0, 0.9, 0.0, true, 1000).unwrap();
        assert_eq!(delay.process(input.clone()), input);
    }

    #[test]
    fn test_tail_extends_buffer() {
        let mut delay = Delay::new(10.0, 0.5, 0.5, true, 1000).unwrap();
        // ln(0.001) / ln(0.5) = 9.97 -> 10 periods
        assert_eq!(delay.tail_frames(), 100);
        let out = delay.process(impulse(5));
        assert_eq!(out.frames(), 105);

        let no_feedback = Delay::new(10.0, 0.0, 0.5, true, 1000).unwrap();
        assert_eq!(no_feedback.tail_frames(), 10);
    }

    #[test]
    fn test_stereo_channels_independent() {
        let input = SampleBuffer::new(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1000, 2).unwrap();
        let mut delay = Delay::new(2.0, 0.0, 1.0, false, 1000).unwrap();
        let out = delay.process(input);
        // Left impulse appears two frames later on the left only
        assert_eq!(out.samples(), &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut delay = Delay::new(10.0, 0.5, 1.0, false, 1000).unwrap();
        let first = delay.process(impulse(40));
        delay.reset();
        let second = delay.process(impulse(40));
        assert_eq!(first, second);
    }
}
