//! seq80 Export Backend
//!
//! Serializes sequences and rendered audio into interchange formats: WAV,
//! Standard MIDI File, JSON, CSV and plain text. Every exporter builds the
//! complete file in memory and returns an [`ExportArtifact`] carrying the
//! bytes, the format and a BLAKE3 content hash. Writing the bytes to disk is
//! left to the caller.
//!
//! # Example
//!
//! ```
//! use seq80_backend_export::{export, read_midi, ExportFormat, ExportOptions, ExportSource};
//! use seq80_spec::{Note, Pitch, Sequence};
//!
//! let seq = Sequence::new("arp", 120, 8)
//!     .with_note(Note::new(Pitch::parse("C4").unwrap(), 0))
//!     .with_note(Note::new(Pitch::parse("G4").unwrap(), 4));
//!
//! let artifact = export(
//!     ExportSource::Sequence(&seq),
//!     ExportFormat::Midi,
//!     &ExportOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(artifact.extension(), "mid");
//!
//! let midi = read_midi(&artifact.bytes).unwrap();
//! assert_eq!(midi.pitches(), vec![60, 67]);
//! ```
//!
//! # Formats
//!
//! | Format | Lossless | Source |
//! |--------|----------|--------|
//! | WAV    | -        | sequence (rendered) or buffer |
//! | MIDI   | no       | sequence |
//! | JSON   | yes      | sequence |
//! | CSV    | no       | sequence |
//! | TXT    | no       | sequence |

pub mod artifact;
pub mod csv;
pub mod error;
pub mod export;
pub mod json;
pub mod midi;
pub mod text;

pub use artifact::{ArtifactMetadata, ExportArtifact, ExportFormat, FORMAT_VERSION, GENERATOR};
pub use csv::export_csv;
pub use error::{ExportError, ExportResult};
pub use export::{export, export_sequence_as, ExportOptions, ExportSource};
pub use json::{export_json, import_json, import_sequence, SequenceDocument};
pub use midi::{read_midi, write_midi, MidiFile, MidiNote, PPQ};
pub use text::export_text;
