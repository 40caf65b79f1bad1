//! Standard MIDI File (SMF) writer and reader.
//!
//! Sequences are written as format 0 files: one `MTrk` chunk holding the
//! track name, tempo, a 4/4 time signature and Note-On/Note-Off pairs on
//! channel 0, at 480 ticks per quarter note.
//!
//! The reader is deliberately broader than the writer. It accepts format 0
//! and 1 files, running status, Note-On with velocity 0 as Note-Off and
//! unknown chunks, so files from other tools can be inspected too.

mod reader;
mod writer;

pub use reader::*;
pub use writer::*;

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::error::{ExportError, ExportResult};

/// Ticks per quarter note written into the header.
pub const PPQ: u16 = 480;

/// Channel every note is written on.
pub const MIDI_CHANNEL: u8 = 0;

/// Largest value a variable-length quantity can hold (four bytes).
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

pub(crate) const STATUS_NOTE_OFF: u8 = 0x80;
pub(crate) const STATUS_NOTE_ON: u8 = 0x90;
pub(crate) const STATUS_META: u8 = 0xFF;

pub(crate) const META_TRACK_NAME: u8 = 0x03;
pub(crate) const META_END_OF_TRACK: u8 = 0x2F;
pub(crate) const META_SET_TEMPO: u8 = 0x51;
pub(crate) const META_TIME_SIGNATURE: u8 = 0x58;

/// Writes `value` as a MIDI variable-length quantity.
///
/// Seven bits per byte, most significant group first, with the high bit set
/// on every byte except the last.
pub fn write_vlq<W: Write>(writer: &mut W, value: u32) -> ExportResult<()> {
    if value > MAX_VLQ {
        return Err(ExportError::encoding(format!(
            "variable-length quantity {} exceeds {}",
            value, MAX_VLQ
        )));
    }

    let mut groups = [0u8; 4];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7F) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }

    for i in (0..count).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        writer.write_u8(groups[i] | continuation)?;
    }
    Ok(())
}

/// Reads a variable-length quantity of at most four bytes.
pub fn read_vlq<R: Read>(reader: &mut R) -> ExportResult<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let byte = reader.read_u8().map_err(|_| truncated("variable-length quantity"))?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(ExportError::invalid_midi(
        "variable-length quantity longer than four bytes",
    ))
}

pub(crate) fn truncated(what: &str) -> ExportError {
    ExportError::invalid_midi(format!("truncated {}", what))
}
