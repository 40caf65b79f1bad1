//! Tremolo: sine LFO amplitude modulation.

use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

use super::{check_range, check_sample_rate, lfo};

/// Amplitude modulation with gain `1 - depth * (1 + sin) / 2`.
///
/// Gain swings between `1 - depth` and 1; both channels share one LFO.
#[derive(Debug, Clone)]
pub struct Tremolo {
    rate_hz: f64,
    depth: f64,
    sample_rate: f64,
    frame: u64,
}

impl Tremolo {
    /// Creates a tremolo.
    ///
    /// # Arguments
    /// * `rate_hz` - LFO rate in Hz (0.0-20.0)
    /// * `depth` - Modulation depth (0.0-1.0)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(rate_hz: f64, depth: f64, sample_rate: u32) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("tremolo.rate_hz", rate_hz, 0.0, 20.0)?;
        check_range("tremolo.depth", depth, 0.0, 1.0)?;
        Ok(Self {
            rate_hz,
            depth,
            sample_rate: sample_rate as f64,
            frame: 0,
        })
    }

    /// Gain at an absolute frame index.
    pub fn gain_at(&self, frame: u64) -> f64 {
        let modulation = lfo(self.rate_hz, frame, self.sample_rate, 0);
        1.0 - self.depth * (1.0 + modulation) / 2.0
    }

    /// Processes a buffer. Zero depth returns the input unchanged.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        if self.depth == 0.0 {
            return buffer;
        }

        let channels = buffer.channels() as usize;
        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            let gain = self.gain_at(self.frame);
            for sample in frame.iter_mut() {
                *sample *= gain;
            }
            self.frame += 1;
        }

        buffer
    }

    /// Rewinds the LFO.
    pub fn reset(&mut self) {
        self.frame = 0;
    }
}
