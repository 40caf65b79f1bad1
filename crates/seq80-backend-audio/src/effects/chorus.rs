//! Chorus effect with LFO modulation.

use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

use super::delay_line::DelayLine;
use super::{check_range, check_sample_rate, lfo};

/// Centre of the modulated delay, in milliseconds.
pub const BASE_DELAY_MS: f64 = 20.0;

/// Chorus: a delay swept around [`BASE_DELAY_MS`] by a sine LFO.
///
/// The right channel's LFO runs a quarter cycle ahead of the left.
#[derive(Debug, Clone)]
pub struct Chorus {
    rate_hz: f64,
    depth_samples: f64,
    base_samples: f64,
    mix: f64,
    sample_rate: f64,
    frame: u64,
    lines: [DelayLine; 2],
}

impl Chorus {
    /// Creates a chorus.
    ///
    /// # Arguments
    /// * `rate_hz` - LFO rate in Hz (0.0-20.0)
    /// * `depth_ms` - Modulation depth in milliseconds (0.0-20.0)
    /// * `mix` - Wet/dry mix (0.0-1.0)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(rate_hz: f64, depth_ms: f64, mix: f64, sample_rate: u32) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("chorus.rate_hz", rate_hz, 0.0, 20.0)?;
        check_range("chorus.depth_ms", depth_ms, 0.0, 20.0)?;
        check_range("chorus.mix", mix, 0.0, 1.0)?;

        let sample_rate = sample_rate as f64;
        let base_samples = BASE_DELAY_MS / 1000.0 * sample_rate;
        let depth_samples = depth_ms / 1000.0 * sample_rate;
        let size = (base_samples + depth_samples).ceil() as usize + 3;

        Ok(Self {
            rate_hz,
            depth_samples,
            base_samples,
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
                let modulation = lfo(self.rate_hz, self.frame, self.sample_rate, ch);
                let delay = self.base_samples + self.depth_samples * modulation;
                let delayed = line.read_interpolated(delay);
                line.write(*sample);
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
