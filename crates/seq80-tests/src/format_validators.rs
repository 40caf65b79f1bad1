//! Independent container validators.
//!
//! These parse headers by hand rather than through the export crate, so a
//! bug in the writer cannot hide behind the same bug in its reader.

use std::fmt;

/// Error from format validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// The format being validated.
    pub format: &'static str,
    /// Description of what went wrong.
    pub message: String,
    /// Byte offset where the error occurred, if applicable.
    pub offset: Option<usize>,
}

impl FormatError {
    /// Create a new format error.
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            offset: None,
        }
    }

    /// Create a format error with a byte offset.
    pub fn at_offset(format: &'static str, message: impl Into<String>, offset: usize) -> Self {
        Self {
            format,
            message: message.into(),
            offset: Some(offset),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} error at offset {}: {}", self.format, offset, self.message),
            None => write!(f, "{} error: {}", self.format, self.message),
        }
    }
}

impl std::error::Error for FormatError {}

/// Fields of a canonical 44-byte PCM WAV header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavInfo {
    /// Number of sample frames in the data chunk.
    pub fn num_frames(&self) -> u32 {
        self.data_size / self.block_align as u32
    }
}

/// Validates a canonical PCM16 WAV: RIFF/WAVE, a 16-byte fmt chunk directly
/// followed by the data chunk, and sizes that agree with the file length.
pub fn validate_wav(data: &[u8]) -> Result<WavInfo, FormatError> {
    const HEADER_SIZE: usize = 44;

    if data.len() < HEADER_SIZE {
        return Err(FormatError::new(
            "WAV",
            format!("File too short: {} bytes (minimum {} required)", data.len(), HEADER_SIZE),
        ));
    }
    expect_tag("WAV", data, 0, b"RIFF")?;
    expect_tag("WAV", data, 8, b"WAVE")?;
    expect_tag("WAV", data, 12, b"fmt ")?;
    expect_tag("WAV", data, 36, b"data")?;

    let riff_size = le_u32(data, 4);
    if riff_size as usize != data.len() - 8 {
        return Err(FormatError::at_offset(
            "WAV",
            format!("RIFF size {} does not match file length {}", riff_size, data.len()),
            4,
        ));
    }
    if le_u32(data, 16) != 16 || le_u16(data, 20) != 1 {
        return Err(FormatError::at_offset("WAV", "Expected a 16-byte PCM fmt chunk", 16));
    }

    let info = WavInfo {
        channels: le_u16(data, 22),
        sample_rate: le_u32(data, 24),
        byte_rate: le_u32(data, 28),
        block_align: le_u16(data, 32),
        bits_per_sample: le_u16(data, 34),
        data_size: le_u32(data, 40),
    };

    if info.bits_per_sample != 16 || info.channels == 0 {
        return Err(FormatError::at_offset(
            "WAV",
            format!(
                "Unsupported layout: {} channels, {} bits",
                info.channels, info.bits_per_sample
            ),
            22,
        ));
    }
    if info.block_align != info.channels * 2
        || info.byte_rate != info.sample_rate * info.block_align as u32
    {
        return Err(FormatError::at_offset("WAV", "Inconsistent byte rate or block align", 28));
    }
    if info.data_size as usize != data.len() - HEADER_SIZE {
        return Err(FormatError::at_offset(
            "WAV",
            format!(
                "Data size {} does not match payload of {} bytes",
                info.data_size,
                data.len() - HEADER_SIZE
            ),
            40,
        ));
    }

    Ok(info)
}

/// Header fields of a Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmfInfo {
    pub format: u16,
    pub tracks: u16,
    pub division: u16,
    /// Byte length of each MTrk chunk payload, in file order.
    pub track_lengths: Vec<u32>,
}

/// Validates MThd and walks the MTrk chunks, checking that every track ends
/// with an End-of-Track meta event and that chunk sizes cover the file.
pub fn validate_smf(data: &[u8]) -> Result<SmfInfo, FormatError> {
    if data.len() < 14 {
        return Err(FormatError::new("SMF", format!("File too short: {} bytes", data.len())));
    }
    expect_tag("SMF", data, 0, b"MThd")?;
    if be_u32(data, 4) != 6 {
        return Err(FormatError::at_offset("SMF", "MThd length must be 6", 4));
    }

    let mut info = SmfInfo {
        format: be_u16(data, 8),
        tracks: be_u16(data, 10),
        division: be_u16(data, 12),
        track_lengths: Vec::new(),
    };

    let mut offset = 14;
    while offset < data.len() {
        if offset + 8 > data.len() {
            return Err(FormatError::at_offset("SMF", "Truncated chunk header", offset));
        }
        expect_tag("SMF", data, offset, b"MTrk")?;
        let len = be_u32(data, offset + 4);
        let end = offset + 8 + len as usize;
        if end > data.len() {
            return Err(FormatError::at_offset(
                "SMF",
                format!("Track length {} runs past end of file", len),
                offset + 4,
            ));
        }
        if len < 3 || data[end - 3..end] != [0xFF, 0x2F, 0x00] {
            return Err(FormatError::at_offset("SMF", "Track does not end with End-of-Track", end));
        }
        info.track_lengths.push(len);
        offset = end;
    }

    if info.track_lengths.len() != info.tracks as usize {
        return Err(FormatError::new(
            "SMF",
            format!(
                "Header declares {} tracks, found {}",
                info.tracks,
                info.track_lengths.len()
            ),
        ));
    }

    Ok(info)
}

fn expect_tag(
    format: &'static str,
    data: &[u8],
    offset: usize,
    tag: &[u8; 4],
) -> Result<(), FormatError> {
    if &data[offset..offset + 4] != tag {
        return Err(FormatError::at_offset(
            format,
            format!(
                "Expected '{}', got {:?}",
                String::from_utf8_lossy(tag),
                &data[offset..offset + 4]
            ),
            offset,
        ));
    }
    Ok(())
}

fn le_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn le_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn be_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
