//! seq80 Sequence Library
//!
//! Types shared by every seq80 crate: pitches, notes, sequences, render
//! configuration, effect chain definitions, the pattern library and project
//! metadata, plus the error taxonomy every backend reports through.
//!
//! # Example
//!
//! ```
//! use seq80_spec::{Note, Pitch, Sequence};
//!
//! let seq = Sequence::new("arp", 120, 8)
//!     .with_note(Note::new(Pitch::parse("C4").unwrap(), 0))
//!     .with_note(Note::new(Pitch::parse("E4").unwrap(), 2));
//!
//! assert!(seq.validate().is_ok());
//! assert!((seq.step_duration_seconds() - 0.125).abs() < 1e-12);
//! ```
//!
//! # Modules
//!
//! - [`pitch`]: note names and equal-tempered frequencies
//! - [`note`] / [`sequence`]: the step grid
//! - [`config`]: render configuration and capacity budget
//! - [`effects`]: serializable effect chain entries
//! - [`patterns`]: built-in and custom patterns
//! - [`project`]: project metadata
//! - [`hash`]: BLAKE3 content hashing
//! - [`error`]: error types and the shared [`BackendError`] trait

pub mod config;
pub mod effects;
pub mod error;
pub mod hash;
pub mod note;
pub mod patterns;
pub mod pitch;
pub mod project;
pub mod sequence;

pub use config::{EnvelopeConfig, RenderBudget, RenderConfig, Waveform, DEFAULT_SAMPLE_RATE};
pub use effects::{DistortionCurve, EffectPreset, EffectSpec, FilterMode};
pub use error::{BackendError, ErrorKind, PipelineError, SpecError, SpecResult};
pub use hash::{content_hash, sequence_hash};
pub use note::{Note, NoteDuration, DEFAULT_VELOCITY};
pub use patterns::{Pattern, PatternLibrary};
pub use pitch::Pitch;
pub use project::{sanitize_project_name, Project, ProjectSettings};
pub use sequence::{
    Sequence, DEFAULT_STEPS, DEFAULT_STEPS_PER_BEAT, MAX_STEPS, MAX_TEMPO, MIN_TEMPO,
};
