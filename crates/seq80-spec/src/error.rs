//! Error types for sequence validation and the shared error taxonomy.

use thiserror::Error;

/// Failure classes reported by every seq80 operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter is outside its accepted range (tempo, effect coefficient,
    /// frequency, step index, ...). Raised before any buffer is touched.
    Validation,
    /// A requested buffer would exceed the configured sample budget.
    Capacity,
    /// The data cannot be represented in the requested output format.
    Format,
    /// An internal invariant broke while writing a binary container.
    Encoding,
    /// Reading or writing files in the caller layer failed.
    Io,
}

impl ErrorKind {
    /// Returns the lowercase name of the kind (e.g., "validation").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Capacity => "capacity",
            ErrorKind::Format => "format",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building or validating sequences, pitches and
/// render configuration.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A pitch string could not be parsed.
    #[error("invalid pitch '{input}': {reason}")]
    InvalidPitch {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A named parameter is out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name (e.g., "sequence.tempo").
        name: String,
        /// Error message.
        message: String,
    },

    /// A note is placed past the end of the sequence.
    #[error("note at step {step} is outside a {steps}-step sequence")]
    StepOutOfRange {
        /// Step index of the offending note.
        step: u32,
        /// Number of steps in the sequence.
        steps: u32,
    },

    /// Two notes occupy the same step of a single-voice sequence.
    #[error("step {step} already holds a note")]
    DuplicateStep {
        /// The doubly occupied step.
        step: u32,
    },

    /// Pattern lookup failed.
    #[error("unknown pattern '{0}'")]
    UnknownPattern(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid pitch error.
    pub fn invalid_pitch(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPitch {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidPitch { .. } => "SPEC_001",
            SpecError::InvalidParameter { .. } => "SPEC_002",
            SpecError::StepOutOfRange { .. } => "SPEC_003",
            SpecError::DuplicateStep { .. } => "SPEC_004",
            SpecError::UnknownPattern(_) => "SPEC_005",
            SpecError::Json(_) => "SPEC_006",
            SpecError::Io(_) => "SPEC_007",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            SpecError::Json(_) => ErrorKind::Format,
            SpecError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Validation,
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Common trait for errors raised by seq80 crates.
///
/// Each crate's error enum implements this so callers can report a stable
/// code and the taxonomy kind without matching on crate-specific variants.
///
/// # Example
///
/// ```ignore
/// use seq80_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{} {}] {}", err.code(), err.kind(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "AUDIO_001" or "EXPORT_003".
    fn code(&self) -> &'static str;

    /// The taxonomy class of the failure.
    fn kind(&self) -> ErrorKind;

    /// Human-readable message; the `Display` output by default.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category for grouping ("spec", "audio", "export").
    fn category(&self) -> &'static str;
}

/// A type-erased error carrying the code, kind and message of any
/// [`BackendError`].
#[derive(Debug)]
pub struct PipelineError {
    /// The error code (e.g., "AUDIO_006").
    pub code: &'static str,
    /// The taxonomy kind.
    pub kind: ErrorKind,
    /// The human-readable error message.
    pub message: String,
    /// The error category.
    pub category: &'static str,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PipelineError {
    /// Wraps any `BackendError` implementor.
    pub fn from_backend<E: BackendError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            code: err.code(),
            kind: err.kind(),
            message: err.message(),
            category: err.category(),
            source: Some(Box::new(err)),
        }
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}] {}", self.code, self.kind, self.message)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
