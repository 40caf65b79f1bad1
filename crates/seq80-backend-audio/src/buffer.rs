//! Interleaved sample buffers passed between render, effect and export stages.

use crate::error::{AudioError, AudioResult};

/// Largest supported channel count.
pub const MAX_CHANNELS: u16 = 2;

/// Interleaved floating-point audio tagged with its sample rate and layout.
///
/// Every stage takes a buffer by value and hands back a buffer, so there is
/// never more than one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Creates a buffer from interleaved samples.
    ///
    /// Fails if the sample rate is zero, the channel count is not 1 or 2, or
    /// the sample count is not a whole number of frames.
    pub fn new(samples: Vec<f64>, sample_rate: u32, channels: u16) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(AudioError::invalid_param(
                "buffer.channels",
                format!("must be 1 or 2, got {}", channels),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::invalid_param(
                "buffer.samples",
                format!(
                    "{} samples is not a whole number of {}-channel frames",
                    samples.len(),
                    channels
                ),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Creates a mono buffer.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Creates a zero-filled buffer of `frames` frames.
    pub fn silent(frames: usize, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: vec![0.0; frames * channels as usize],
            sample_rate,
            channels,
        }
    }

    /// Returns the interleaved samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Returns the interleaved samples mutably.
    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    /// Consumes the buffer, returning the interleaved samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Total number of samples across channels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }

    /// Appends `frames` frames of silence.
    pub fn extend_silence(&mut self, frames: usize) {
        let new_len = self.samples.len() + frames * self.channels as usize;
        self.samples.resize(new_len, 0.0);
    }

    /// Clamps every sample to [-1, 1].
    pub fn clamp(mut self) -> Self {
        for s in &mut self.samples {
            *s = s.clamp(-1.0, 1.0);
        }
        self
    }

    /// Duplicates a mono buffer into two channels. Stereo buffers are
    /// returned unchanged.
    pub fn into_stereo(self) -> Self {
        if self.channels == 2 {
            return self;
        }
        let samples = self.samples.iter().flat_map(|&s| [s, s]).collect();
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_layout() {
        assert!(SampleBuffer::new(vec![0.0; 4], 44100, 2).is_ok());
        assert!(SampleBuffer::new(vec![0.0; 3], 44100, 2).is_err());
        assert!(SampleBuffer::new(vec![0.0; 4], 44100, 3).is_err());
        assert!(matches!(
            SampleBuffer::new(vec![0.0; 4], 0, 1),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));
    }

    #[test]
    fn test_frames_and_duration() {
        let buffer = SampleBuffer::silent(22050, 44100, 2);
        assert_eq!(buffer.frames(), 22050);
        assert_eq!(buffer.len(), 44100);
        assert!((buffer.duration_seconds() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_into_stereo_duplicates() {
        let stereo = SampleBuffer::mono(vec![0.1, -0.2], 8000).into_stereo();
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.samples(), &[0.1, 0.1, -0.2, -0.2]);
        assert_eq!(stereo.clone().into_stereo(), stereo);
    }

    #[test]
    fn test_clamp_and_peak() {
        let buffer = SampleBuffer::mono(vec![1.5, -0.25, -3.0], 8000);
        assert!((buffer.peak() - 3.0).abs() < 1e-12);
        let clamped = buffer.clamp();
        assert_eq!(clamped.samples(), &[1.0, -0.25, -1.0]);
    }

    #[test]
    fn test_extend_silence() {
        let mut buffer = SampleBuffer::new(vec![0.5, 0.5], 8000, 2).unwrap();
        buffer.extend_silence(3);
        assert_eq!(buffer.frames(), 4);
        assert_eq!(&buffer.samples()[2..], &[0.0; 6]);
    }
}
