//! seq80 End-to-End Test Infrastructure
//!
//! Integration tests for the full pipeline:
//!
//! - **Determinism**: byte-identical renders and exports across runs
//! - **Scenario**: the reference arpeggio rendered to an exact WAV layout
//! - **Round-trips**: WAV, MIDI and JSON read back with independent decoders
//! - **Properties**: proptest over oscillator lengths, pitches and effects
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p seq80-tests
//! ```

pub mod determinism;
pub mod fixtures;
pub mod format_validators;

// Re-export commonly used items
pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use format_validators::{validate_smf, validate_wav, FormatError, SmfInfo, WavInfo};
