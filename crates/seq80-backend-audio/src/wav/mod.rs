//! Deterministic WAV file writer and reader.
//!
//! Files are 16-bit PCM with the canonical 44-byte header and no optional
//! chunks, so identical buffers always encode to identical bytes. The hash
//! of the PCM payload identifies the audio independently of the header.

mod format;
mod pcm;
mod result;
mod writer;


// Re-export public API
pub use format::{WavFormat, BITS_PER_SAMPLE, HEADER_LEN};
pub use pcm::{compute_pcm_hash, extract_pcm_data, read_pcm16};
pub use result::WavResult;
pub use writer::{encode_wav, samples_to_pcm16, write_wav};
