//! WAV file format parameters.

use crate::buffer::SampleBuffer;

/// Size of the canonical RIFF/WAVE header written by this crate.
pub const HEADER_LEN: usize = 44;

/// Bit depth of every file this crate writes.
pub const BITS_PER_SAMPLE: u16 = 16;

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16 when writing).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates a mono WAV format.
    pub fn mono(sample_rate: u32) -> Self {
        Self::new(1, sample_rate)
    }

    /// Creates a stereo WAV format.
    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(2, sample_rate)
    }

    /// Format matching a buffer's layout.
    pub fn for_buffer(buffer: &SampleBuffer) -> Self {
        Self::new(buffer.channels(), buffer.sample_rate())
    }

    fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    /// Calculates bytes per sample (per channel).
    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Calculates block align (bytes per sample frame).
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Calculates byte rate (bytes per second), or `None` if it does not
    /// fit the 32-bit header field.
    pub(crate) fn byte_rate(&self) -> Option<u32> {
        self.sample_rate.checked_mul(self.block_align() as u32)
    }
}
