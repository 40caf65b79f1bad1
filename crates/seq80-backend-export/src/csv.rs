//! CSV note listing.

use std::fmt::Write;

use seq80_spec::Sequence;

use crate::error::ExportResult;

/// Column header, without the line ending.
pub const CSV_HEADER: &str = "Step,Pitch,MidiNote,Frequency,Velocity,Duration";

/// Writes one row per note in step order.
///
/// Steps are 1-based, frequency has two decimals, velocity three and
/// duration is in steps. Lines end with `\n`.
pub fn export_csv(sequence: &Sequence) -> ExportResult<Vec<u8>> {
    sequence.validate()?;
    let step_seconds = sequence.step_duration_seconds();

    let mut out = String::with_capacity(64 * (sequence.notes.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for note in sequence.step_slots().into_iter().flatten() {
        writeln!(
            out,
            "{},{},{},{:.2},{:.3},{}",
            note.step + 1,
            note.pitch,
            note.pitch.number(),
            note.frequency(),
            note.velocity,
            round_steps(note.duration.to_steps(step_seconds)),
        )?;
    }
    Ok(out.into_bytes())
}

/// Trims float noise from durations given in seconds.
fn round_steps(steps: f64) -> f64 {
    (steps * 1e6).round() / 1e6
}
