//! Error types for the export backend.

use seq80_backend_audio::AudioError;
use seq80_spec::{BackendError, ErrorKind, SpecError};
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting or importing.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The sequence failed validation.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Rendering or WAV encoding failed.
    #[error(transparent)]
    Audio(#[from] AudioError),

    /// An element of the source has no representation in the target format.
    #[error("cannot export {context} as {format}: {message}")]
    Unrepresentable {
        /// Target format name.
        format: &'static str,
        /// The offending element, e.g. `step 3 (G10)`.
        context: String,
        /// What is out of range.
        message: String,
    },

    /// The source kind cannot be exported to the requested format.
    #[error("unsupported export: {message}")]
    Unsupported {
        /// Error message.
        message: String,
    },

    /// Malformed Standard MIDI File.
    #[error("invalid MIDI data: {message}")]
    InvalidMidi {
        /// What was wrong.
        message: String,
    },

    /// Malformed JSON document.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A container invariant broke while encoding.
    #[error("encoding error: {message}")]
    Encoding {
        /// Error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A text listing could not be formatted.
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl ExportError {
    /// Creates an unrepresentable-element error.
    pub fn unrepresentable(
        format: &'static str,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Unrepresentable {
            format,
            context: context.into(),
            message: message.into(),
        }
    }

    /// Creates an unsupported-export error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Creates an invalid MIDI error.
    pub fn invalid_midi(message: impl Into<String>) -> Self {
        Self::InvalidMidi {
            message: message.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

impl BackendError for ExportError {
    fn code(&self) -> &'static str {
        match self {
            ExportError::Spec(_) => "EXPORT_001",
            ExportError::Audio(_) => "EXPORT_002",
            ExportError::Unrepresentable { .. } => "EXPORT_003",
            ExportError::Unsupported { .. } => "EXPORT_004",
            ExportError::InvalidMidi { .. } => "EXPORT_005",
            ExportError::Json(_) => "EXPORT_006",
            ExportError::Encoding { .. } => "EXPORT_007",
            ExportError::Io(_) => "EXPORT_008",
            ExportError::Format(_) => "EXPORT_009",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ExportError::Spec(err) => err.kind(),
            ExportError::Audio(err) => err.kind(),
            ExportError::Unrepresentable { .. }
            | ExportError::Unsupported { .. }
            | ExportError::InvalidMidi { .. }
            | ExportError::Json(_) => ErrorKind::Format,
            ExportError::Encoding { .. } | ExportError::Format(_) => ErrorKind::Encoding,
            ExportError::Io(_) => ErrorKind::Io,
        }
    }

    fn category(&self) -> &'static str {
        "export"
    }
}
