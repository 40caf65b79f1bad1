//! seq80 Audio Backend
//!
//! Turns step sequences into audio: a band-aware oscillator, per-note
//! declick envelopes, a chain of stateful effects and a byte-exact WAV
//! encoder.
//!
//! # Determinism
//!
//! Rendering is a pure function of the sequence and [`RenderConfig`]. Noise
//! is drawn from PCG32 with per-step seeds derived via BLAKE3, so the same
//! inputs always yield byte-identical WAV files.
//!
//! # Example
//!
//! ```
//! use seq80_backend_audio::{render, WavResult};
//! use seq80_spec::{Note, Pitch, RenderConfig, Sequence};
//!
//! let seq = Sequence::new("arp", 120, 8)
//!     .with_note(Note::new(Pitch::parse("C4").unwrap(), 0))
//!     .with_note(Note::new(Pitch::parse("G4").unwrap(), 4));
//!
//! let buffer = render(&seq, &RenderConfig::default()).unwrap();
//! assert_eq!(buffer.len(), 8 * 5512);
//!
//! let wav = WavResult::from_buffer(&buffer).unwrap();
//! assert_eq!(wav.wav_data.len(), 44 + 2 * buffer.len());
//! ```
//!
//! # Crate Structure
//!
//! - [`render()`] - Sequence renderer, with [`renderer::StepTiming`] for playheads
//! - [`oscillator`] - Waveform generators
//! - [`envelope`] - Attack/release ramps
//! - [`effects`] - Delay, reverb, chorus, flanger, distortion, filter,
//!   compressor, tremolo and the [`EffectChain`]
//! - [`wav`] - Deterministic WAV writer and PCM16 reader
//! - [`rng`] - Deterministic RNG with seed derivation
//!
//! [`RenderConfig`]: seq80_spec::RenderConfig

pub mod buffer;
pub mod effects;
pub mod envelope;
pub mod error;
pub mod oscillator;
pub mod renderer;
pub mod rng;
pub mod wav;

// Re-export main types at crate root
pub use buffer::SampleBuffer;
pub use effects::{Effect, EffectChain};
pub use error::{AudioError, AudioResult};
pub use oscillator::{synthesize, synthesize_seeded};
pub use renderer::{apply_effects, render, render_with_effects, render_with_waveform, StepTiming};
pub use wav::{encode_wav, read_pcm16, WavResult};
