//! Atomic file output.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes `bytes` to `path` via a temporary file in the same directory and
/// a rename, so readers never observe a partial file.
///
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move output into place: {}", path.display()))?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}
