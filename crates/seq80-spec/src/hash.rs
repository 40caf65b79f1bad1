//! BLAKE3 hashing for sequences and exported bytes.

use crate::error::SpecResult;
use crate::sequence::Sequence;

/// Returns the lowercase hex BLAKE3 hash of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Hashes the compact JSON form of a sequence.
///
/// Struct fields serialize in declaration order, so equal sequences always
/// produce equal hashes.
pub fn sequence_hash(sequence: &Sequence) -> SpecResult<String> {
    let bytes = serde_json::to_vec(sequence)?;
    Ok(content_hash(&bytes))
}
