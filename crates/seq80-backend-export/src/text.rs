//! Human-readable step listing.

use std::fmt::Write;

use seq80_spec::Sequence;

use crate::error::ExportResult;

/// First line of every text export.
pub const TEXT_TITLE: &str = "seq80 Sequence Export";

/// Writes a title block and one line per step, `Step  1: C4` or
/// `Step  2: (rest)`.
pub fn export_text(sequence: &Sequence) -> ExportResult<Vec<u8>> {
    sequence.validate()?;

    let mut out = String::new();
    writeln!(out, "{}", TEXT_TITLE)?;
    writeln!(out, "{}", "=".repeat(30))?;
    writeln!(out, "Name: {}", sequence.name)?;
    writeln!(out, "Tempo: {} BPM", sequence.tempo)?;
    writeln!(out, "Steps: {}", sequence.steps)?;
    writeln!(out, "Total Notes: {}", sequence.notes.len())?;
    out.push('\n');
    writeln!(out, "Step-by-step breakdown:")?;
    writeln!(out, "{}", "-".repeat(25))?;

    for (step, slot) in sequence.step_slots().into_iter().enumerate() {
        match slot {
            Some(note) => writeln!(out, "Step {:2}: {}", step + 1, note.pitch)?,
            None => writeln!(out, "Step {:2}: (rest)", step + 1)?,
        }
    }
    Ok(out.into_bytes())
}
