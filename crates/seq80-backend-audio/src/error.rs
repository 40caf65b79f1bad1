//! Error types for audio backend.

use seq80_spec::{BackendError, ErrorKind, SpecError};
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during synthesis, effect processing and WAV coding.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The sequence or render configuration failed validation.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid frequency.
    #[error("invalid frequency: {freq} Hz")]
    InvalidFrequency {
        /// The invalid frequency.
        freq: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A buffer would exceed the configured sample budget.
    #[error("buffer of {requested} samples exceeds the limit of {limit}")]
    Capacity {
        /// Samples (frames times channels) that were requested.
        requested: u64,
        /// The configured maximum.
        limit: u64,
    },

    /// Malformed WAV input.
    #[error("invalid WAV data: {message}")]
    InvalidWav {
        /// What was wrong.
        message: String,
    },

    /// A container size or layout invariant broke while encoding.
    #[error("encoding error: {message}")]
    Encoding {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates an invalid WAV error.
    pub fn invalid_wav(message: impl Into<String>) -> Self {
        Self::InvalidWav {
            message: message.into(),
        }
    }

    /// Prefixes the parameter name of an `InvalidParameter` error.
    ///
    /// Used by the effect chain so a failure reads `effects[2].delay.feedback`.
    pub(crate) fn with_param_prefix(self, prefix: &str) -> Self {
        match self {
            AudioError::InvalidParameter { name, message } => AudioError::InvalidParameter {
                name: format!("{}.{}", prefix, name),
                message,
            },
            other => other,
        }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::Spec(_) => "AUDIO_001",
            AudioError::InvalidSampleRate { .. } => "AUDIO_002",
            AudioError::InvalidDuration { .. } => "AUDIO_003",
            AudioError::InvalidFrequency { .. } => "AUDIO_004",
            AudioError::InvalidParameter { .. } => "AUDIO_005",
            AudioError::Capacity { .. } => "AUDIO_006",
            AudioError::InvalidWav { .. } => "AUDIO_007",
            AudioError::Encoding { .. } => "AUDIO_008",
            AudioError::Io(_) => "AUDIO_009",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            AudioError::Spec(err) => err.kind(),
            AudioError::InvalidSampleRate { .. }
            | AudioError::InvalidDuration { .. }
            | AudioError::InvalidFrequency { .. }
            | AudioError::InvalidParameter { .. } => ErrorKind::Validation,
            AudioError::Capacity { .. } => ErrorKind::Capacity,
            AudioError::InvalidWav { .. } => ErrorKind::Format,
            AudioError::Encoding { .. } => ErrorKind::Encoding,
            AudioError::Io(_) => ErrorKind::Io,
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}
