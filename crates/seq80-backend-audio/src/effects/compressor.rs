//! Dynamics processing: compressor.

use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

use super::{check_range, check_sample_rate};

/// Converts linear amplitude to decibels.
fn amp_to_db(amp: f64) -> f64 {
    20.0 * amp.abs().max(1e-10).log10()
}

/// Converts decibels to linear amplitude.
fn db_to_amp(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Feed-forward compressor with a linked RMS envelope follower.
#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f64,
    ratio: f64,
    makeup_db: f64,
    attack_coeff: f64,
    release_coeff: f64,
    envelope: f64,
}

impl Compressor {
    /// Creates a compressor.
    ///
    /// # Arguments
    /// * `threshold_db` - Threshold in dBFS (-60 to 0)
    /// * `ratio` - Compression ratio (1.0-20.0)
    /// * `attack_ms` - Attack time in milliseconds (0.1-100)
    /// * `release_ms` - Release time in milliseconds (1-1000)
    /// * `makeup_db` - Makeup gain in dB (0-24)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        threshold_db: f64,
        ratio: f64,
        attack_ms: f64,
        release_ms: f64,
        makeup_db: f64,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        check_range("compressor.threshold_db", threshold_db, -60.0, 0.0)?;
        check_range("compressor.ratio", ratio, 1.0, 20.0)?;
        check_range("compressor.attack_ms", attack_ms, 0.1, 100.0)?;
        check_range("compressor.release_ms", release_ms, 1.0, 1000.0)?;
        check_range("compressor.makeup_db", makeup_db, 0.0, 24.0)?;

        let sr = sample_rate as f64;

        // Convert time constants to coefficients
        let attack_coeff = (-1.0 / (attack_ms * 0.001 * sr)).exp();
        let release_coeff = (-1.0 / (release_ms * 0.001 * sr)).exp();

        Ok(Self {
            threshold_db,
            ratio,
            makeup_db,
            attack_coeff,
            release_coeff,
            envelope: 0.0,
        })
    }

    /// Gain reduction in dB (<= 0) for an envelope level in dB.
    pub fn gain_reduction_db(&self, level_db: f64) -> f64 {
        if level_db > self.threshold_db {
            let over_db = level_db - self.threshold_db;
            -(over_db * (1.0 - 1.0 / self.ratio))
        } else {
            0.0
        }
    }

    /// Processes a buffer. A 1:1 ratio with no makeup gain returns the input
    /// unchanged.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        if self.ratio == 1.0 && self.makeup_db == 0.0 {
            return buffer;
        }

        let channels = buffer.channels() as usize;
        let makeup_gain = db_to_amp(self.makeup_db);

        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            // RMS across channels
            let power: f64 = frame.iter().map(|s| s * s).sum::<f64>() / channels as f64;
            let input_level = power.sqrt();

            // Envelope follower
            let coeff = if input_level > self.envelope {
                self.attack_coeff
            } else {
                self.release_coeff
            };
            self.envelope = coeff * self.envelope + (1.0 - coeff) * input_level;

            let gain_db = self.gain_reduction_db(amp_to_db(self.envelope));
            let gain = db_to_amp(gain_db) * makeup_gain;

            for sample in frame.iter_mut() {
                *sample *= gain;
            }
        }

        buffer
    }

    /// Resets the envelope follower.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(level: f64, frames: usize) -> SampleBuffer {
        SampleBuffer::mono(vec![level; frames], 44100)
    }

    #[test]
    fn test_db_conversions() {
        assert!((amp_to_db(1.0)).abs() < 1e-12);
        assert!((amp_to_db(0.5) + 6.0206).abs() < 1e-3);
        assert!((db_to_amp(-20.0) - 0.1).abs() < 1e-12);
        assert_eq!(amp_to_db(0.0), -200.0);
    }

    #[test]
    fn test_unity_ratio_is_identity() {
        let input = SampleBuffer::mono((0..256).map(|i| (i as f64 * 0.2).sin()).collect(), 44100);
        let mut comp = Compressor::new(-30.0, 1.0, 5.0, 50.0, 0.0, 44100).unwrap();
        assert_eq!(comp.process(input.clone()), input);
    }

    #[test]
    fn test_gain_computer() {
        let comp = Compressor::new(-20.0, 4.0, 5.0, 50.0, 0.0, 44100).unwrap();
        assert_eq!(comp.gain_reduction_db(-30.0), 0.0);
        // 8 dB over at 4:1 leaves 2 dB, a 6 dB cut
        assert!((comp.gain_reduction_db(-12.0) + 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_steady_state_reduction() {
        // 0 dBFS through a -20 dB threshold at 4:1 settles at -15 dB gain
        let mut comp = Compressor::new(-20.0, 4.0, 1.0, 50.0, 0.0, 44100).unwrap();
        let out = comp.process(constant(1.0, 44100));
        let last = *out.samples().last().unwrap();
        assert!((amp_to_db(last) + 15.0).abs() < 0.1);
    }

    #[test]
    fn test_below_threshold_only_makeup() {
        let mut comp = Compressor::new(-6.0, 8.0, 1.0, 50.0, 6.0, 44100).unwrap();
        let out = comp.process(constant(0.1, 4410));
        let expected = 0.1 * db_to_amp(6.0);
        assert!(out.samples().iter().all(|s| (s - expected).abs() < 1e-12));
    }

    #[test]
    fn test_validation() {
        assert!(Compressor::new(5.0, 4.0, 5.0, 50.0, 0.0, 44100).is_err());
        assert!(Compressor::new(-20.0, 0.5, 5.0, 50.0, 0.0, 44100).is_err());
        assert!(Compressor::new(-20.0, 4.0, 0.0, 50.0, 0.0, 44100).is_err());
        assert!(Compressor::new(-20.0, 4.0, 5.0, 0.5, 0.0, 44100).is_err());
        assert!(Compressor::new(-20.0, 4.0, 5.0, 50.0, 30.0, 44100).is_err());
    }
}
