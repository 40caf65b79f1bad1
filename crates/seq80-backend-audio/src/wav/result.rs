//! WAV file generation result type.

use crate::buffer::SampleBuffer;
use crate::error::AudioResult;

use super::format::WavFormat;
use super::writer::{encode_pcm, samples_to_pcm16};

/// Result of WAV file generation.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload only.
    pub pcm_hash: String,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of frames (samples per channel).
    pub num_frames: usize,
}

impl WavResult {
    /// Encodes a buffer.
    pub fn from_buffer(buffer: &SampleBuffer) -> AudioResult<Self> {
        let pcm = samples_to_pcm16(buffer.samples());
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = encode_pcm(&WavFormat::for_buffer(buffer), &pcm)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate(),
            num_frames: buffer.frames(),
        })
    }

    /// Whether the output is stereo.
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.sample_rate as f64
    }
}
