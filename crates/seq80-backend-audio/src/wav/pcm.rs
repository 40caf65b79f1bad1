//! PCM extraction, hashing and decoding.

use crate::buffer::{SampleBuffer, MAX_CHANNELS};
use crate::error::{AudioError, AudioResult};

use super::format::BITS_PER_SAMPLE;
use super::writer::{read_u16, read_u32};

/// Finds the body of the first chunk with `id` after the RIFF/WAVE header.
fn find_chunk<'a>(wav_data: &'a [u8], id: &[u8; 4]) -> Option<&'a [u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = read_u32(wav_data, pos + 4) as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(chunk_size)?;

        if chunk_id == id {
            return wav_data.get(body_start..body_end);
        }

        // Chunks are padded to an even length
        pos = body_end + (chunk_size & 1);
    }

    None
}

/// Extracts PCM data from a WAV file buffer.
///
/// Used for comparing WAV files by their audio content only. Returns `None`
/// if the bytes are not RIFF/WAVE or have no complete `data` chunk.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    find_chunk(wav_data, b"data")
}

/// BLAKE3 hash of a WAV file's PCM payload, or `None` if it has none.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}

/// Decodes a 16-bit PCM WAV file into a buffer.
///
/// Samples are scaled by `1 / 32767`, the inverse of the writer, so
/// re-encoding the result reproduces the original payload.
///
/// # Errors
/// [`AudioError::InvalidWav`] for anything other than mono or stereo
/// 16-bit PCM.
pub fn read_pcm16(wav_data: &[u8]) -> AudioResult<SampleBuffer> {
    let fmt = find_chunk(wav_data, b"fmt ")
        .ok_or_else(|| AudioError::invalid_wav("missing RIFF/WAVE header or fmt chunk"))?;
    if fmt.len() < 16 {
        return Err(AudioError::invalid_wav(format!(
            "fmt chunk is {} bytes, expected at least 16",
            fmt.len()
        )));
    }

    let audio_format = read_u16(fmt, 0);
    let channels = read_u16(fmt, 2);
    let sample_rate = read_u32(fmt, 4);
    let bits_per_sample = read_u16(fmt, 14);

    if audio_format != 1 {
        return Err(AudioError::invalid_wav(format!(
            "audio format {} is not PCM",
            audio_format
        )));
    }
    if bits_per_sample != BITS_PER_SAMPLE {
        return Err(AudioError::invalid_wav(format!(
            "{}-bit samples are not supported, expected 16",
            bits_per_sample
        )));
    }
    if !(1..=MAX_CHANNELS).contains(&channels) {
        return Err(AudioError::invalid_wav(format!(
            "{} channels are not supported",
            channels
        )));
    }
    if sample_rate == 0 {
        return Err(AudioError::invalid_wav("sample rate is zero"));
    }

    let pcm = extract_pcm_data(wav_data)
        .ok_or_else(|| AudioError::invalid_wav("missing or truncated data chunk"))?;
    let block_align = channels as usize * 2;
    if pcm.len() % block_align != 0 {
        return Err(AudioError::invalid_wav(format!(
            "data chunk of {} bytes is not a whole number of frames",
            pcm.len()
        )));
    }

    let samples = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f64 / 32767.0)
        .collect();
    SampleBuffer::new(samples, sample_rate, channels)
}
