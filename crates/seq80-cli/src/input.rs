//! Loading sequence documents from disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use seq80_backend_export::{import_json, SequenceDocument};
use seq80_spec::content_hash;

/// A sequence document plus provenance.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed, validated document.
    pub document: SequenceDocument,
    /// BLAKE3 hash of the file contents (hex string).
    pub source_hash: String,
}

/// Reads and validates a JSON sequence document or bare sequence.
pub fn load_sequence(path: &Path) -> Result<LoadResult> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read sequence file: {}", path.display()))?;
    let document = import_json(&bytes)
        .with_context(|| format!("Failed to load sequence: {}", path.display()))?;
    Ok(LoadResult {
        document,
        source_hash: content_hash(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seq80_backend_export::export_json;
    use seq80_spec::Sequence;

    #[test]
    fn test_load_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.json");
        let bytes = export_json(&Sequence::new("loaded", 100, 4), None).unwrap();
        fs::write(&path, &bytes).unwrap();

        let loaded = load_sequence(&path).unwrap();
        assert_eq!(loaded.document.sequence.name, "loaded");
        assert_eq!(loaded.source_hash, content_hash(&bytes));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = load_sequence(Path::new("/nonexistent/seq.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/seq.json"));
    }
}
