//! Export artifacts: bytes plus a format tag and provenance metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use seq80_backend_audio::SampleBuffer;
use seq80_spec::{content_hash, Sequence};

use crate::error::ExportError;

/// Version of the artifact metadata and of the JSON document layout.
pub const FORMAT_VERSION: u32 = 1;

/// Generator name recorded in artifact metadata.
pub const GENERATOR: &str = concat!("seq80 ", env!("CARGO_PKG_VERSION"));

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Wav,
    Midi,
    Json,
    Csv,
    Txt,
}

impl ExportFormat {
    /// Every format, in display order.
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Wav,
        ExportFormat::Midi,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Txt,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Wav => "wav",
            ExportFormat::Midi => "midi",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Midi => "mid",
            other => other.as_str(),
        }
    }

    /// Whether the format keeps every sequence field.
    pub fn is_lossless(&self) -> bool {
        matches!(self, ExportFormat::Json)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wav" => Ok(ExportFormat::Wav),
            "midi" | "mid" => Ok(ExportFormat::Midi),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            other => Err(ExportError::unsupported(format!(
                "unknown format '{}', expected one of wav, midi, json, csv, txt",
                other
            ))),
        }
    }
}

/// Provenance of an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Metadata layout version.
    pub format_version: u32,
    /// Name and version of the producing library.
    pub generator: String,
    /// Sample rate, for audio artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Channel count, for audio artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    /// Tempo, when exported from a sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<u16>,
    /// Step count, when exported from a sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// BLAKE3 hash of the artifact bytes.
    pub content_hash: String,
}

/// The in-memory result of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// Complete file contents.
    pub bytes: Vec<u8>,
    /// Format of `bytes`.
    pub format: ExportFormat,
    /// Provenance metadata.
    pub metadata: ArtifactMetadata,
}

impl ExportArtifact {
    /// Wraps finished bytes, hashing them.
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        let metadata = ArtifactMetadata {
            format_version: FORMAT_VERSION,
            generator: GENERATOR.to_string(),
            sample_rate: None,
            channels: None,
            tempo: None,
            steps: None,
            content_hash: content_hash(&bytes),
        };
        Self {
            bytes,
            format,
            metadata,
        }
    }

    /// Records the sequence's tempo and step count.
    pub fn with_sequence(mut self, sequence: &Sequence) -> Self {
        self.metadata.tempo = Some(sequence.tempo);
        self.metadata.steps = Some(sequence.steps);
        self
    }

    /// Records the audio layout.
    pub fn with_audio(self, buffer: &SampleBuffer) -> Self {
        self.with_audio_format(buffer.sample_rate(), buffer.channels())
    }

    /// Records a sample rate and channel count.
    pub fn with_audio_format(mut self, sample_rate: u32, channels: u16) -> Self {
        self.metadata.sample_rate = Some(sample_rate);
        self.metadata.channels = Some(channels);
        self
    }

    /// File extension for this artifact.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the artifact has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
