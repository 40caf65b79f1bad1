//! WAV encoding.

use std::io::Write;

use crate::buffer::{SampleBuffer, MAX_CHANNELS};
use crate::error::{AudioError, AudioResult};

use super::format::{WavFormat, HEADER_LEN};

/// Bytes between the RIFF chunk size field and the data payload.
const RIFF_OVERHEAD: u32 = 36;

/// Writes a complete WAV file to a writer.
///
/// # Errors
/// * [`AudioError::Encoding`] if the payload is not a whole number of frames,
///   or the payload or byte rate does not fit the 32-bit header fields
/// * [`AudioError::Io`] if the writer fails
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> AudioResult<()> {
    if !(1..=MAX_CHANNELS).contains(&format.channels) {
        return Err(AudioError::encoding(format!(
            "{} channels cannot be written",
            format.channels
        )));
    }
    let byte_rate = format.byte_rate().ok_or_else(|| {
        AudioError::encoding(format!(
            "byte rate of {} Hz x {} channels exceeds the 32-bit header field",
            format.sample_rate, format.channels
        ))
    })?;
    let block_align = format.block_align() as usize;
    if block_align == 0 || pcm_data.len() % block_align != 0 {
        return Err(AudioError::encoding(format!(
            "{} PCM bytes is not a whole number of {}-byte frames",
            pcm_data.len(),
            block_align
        )));
    }
    let data_size = u32::try_from(pcm_data.len())
        .ok()
        .filter(|size| *size <= u32::MAX - RIFF_OVERHEAD)
        .ok_or_else(|| {
            AudioError::encoding(format!(
                "{} PCM bytes exceed the RIFF size limit",
                pcm_data.len()
            ))
        })?;
    let file_size = RIFF_OVERHEAD + data_size; // Total file size minus 8 bytes for RIFF header

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Converts f64 samples to 16-bit PCM bytes.
///
/// Each sample is clamped to [-1, 1] and stored as
/// `round(sample * 32767)`, little-endian. NaN encodes as zero.
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);

    for &sample in samples {
        let clipped = sample.clamp(-1.0, 1.0);
        let pcm_value = (clipped * 32767.0).round() as i16;
        pcm.extend_from_slice(&pcm_value.to_le_bytes());
    }

    pcm
}

/// Encodes a buffer as a complete WAV file in memory.
///
/// The header's size fields are checked against the produced bytes before
/// returning.
pub fn encode_wav(buffer: &SampleBuffer) -> AudioResult<Vec<u8>> {
    let format = WavFormat::for_buffer(buffer);
    let pcm = samples_to_pcm16(buffer.samples());
    encode_pcm(&format, &pcm)
}

pub(crate) fn encode_pcm(format: &WavFormat, pcm: &[u8]) -> AudioResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + pcm.len());
    write_wav(&mut bytes, format, pcm)?;
    verify_header(&bytes, pcm.len())?;
    Ok(bytes)
}

/// Checks that the RIFF and data size fields agree with the byte count.
fn verify_header(bytes: &[u8], data_len: usize) -> AudioResult<()> {
    if bytes.len() != HEADER_LEN + data_len {
        return Err(AudioError::encoding(format!(
            "expected {} bytes, wrote {}",
            HEADER_LEN + data_len,
            bytes.len()
        )));
    }
    let riff_size = read_u32(bytes, 4) as usize;
    let data_size = read_u32(bytes, 40) as usize;
    if riff_size != bytes.len() - 8 || data_size != data_len {
        return Err(AudioError::encoding(format!(
            "header sizes (riff {}, data {}) disagree with {} payload bytes",
            riff_size, data_size, data_len
        )));
    }
    Ok(())
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
