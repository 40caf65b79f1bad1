//! Format 0 SMF writer.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use seq80_spec::{Note, Sequence};
use tracing::debug;

use super::{
    write_vlq, MAX_VLQ, META_END_OF_TRACK, META_SET_TEMPO, META_TIME_SIGNATURE,
    META_TRACK_NAME, MIDI_CHANNEL, PPQ, STATUS_META, STATUS_NOTE_OFF, STATUS_NOTE_ON,
};
use crate::error::{ExportError, ExportResult};

/// Release velocity written on every Note-Off.
const NOTE_OFF_VELOCITY: u8 = 0x40;

/// Header chunk plus the `MTrk` chunk id and length.
const HEADER_BYTES: usize = 14 + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // Ordered so a note ending on a tick is released before the next starts.
    NoteOff,
    NoteOn,
}

#[derive(Debug, Clone, Copy)]
struct NoteEvent {
    tick: u64,
    kind: EventKind,
    key: u8,
    velocity: u8,
}

/// Ticks per step at [`PPQ`] resolution.
///
/// Fails when `steps_per_beat` does not divide 480, since the grid would
/// drift.
pub fn ticks_per_step(sequence: &Sequence) -> ExportResult<u32> {
    let spb = sequence.steps_per_beat;
    if spb == 0 || PPQ as u32 % spb != 0 {
        return Err(ExportError::unrepresentable(
            "MIDI",
            "steps_per_beat",
            format!("{} steps per beat does not divide {} ticks", spb, PPQ),
        ));
    }
    Ok(PPQ as u32 / spb)
}

/// Converts a normalized velocity to 1..=127.
///
/// Zero is avoided because a Note-On with velocity 0 reads as a Note-Off.
pub fn midi_velocity(velocity: f64) -> u8 {
    (velocity * 127.0).round().clamp(1.0, 127.0) as u8
}

/// Microseconds per quarter note for a tempo in BPM.
pub fn micros_per_quarter(tempo: u16) -> u32 {
    60_000_000 / tempo.max(1) as u32
}

/// Encodes a sequence as a format 0 Standard MIDI File.
///
/// # Errors
/// * Validation errors from the sequence
/// * [`ExportError::Unrepresentable`] for a pitch above 127, a
///   `steps_per_beat` that does not divide 480, or a track longer than
///   the largest delta time
pub fn write_midi(sequence: &Sequence) -> ExportResult<Vec<u8>> {
    sequence.validate()?;
    let tps = ticks_per_step(sequence)?;

    let end_tick = sequence.steps as u64 * tps as u64;
    if end_tick > MAX_VLQ as u64 {
        return Err(ExportError::unrepresentable(
            "MIDI",
            "end of track",
            format!("{} ticks exceeds {}", end_tick, MAX_VLQ),
        ));
    }

    let events = note_events(sequence, tps)?;
    let track = encode_track(sequence, &events, end_tick)?;
    let track_len = u32::try_from(track.len())
        .map_err(|_| ExportError::encoding("track chunk exceeds 4 GiB"))?;

    let mut out = Vec::with_capacity(HEADER_BYTES + track.len());
    out.write_all(b"MThd")?;
    out.write_u32::<BigEndian>(6)?;
    out.write_u16::<BigEndian>(0)?; // format 0
    out.write_u16::<BigEndian>(1)?; // one track
    out.write_u16::<BigEndian>(PPQ)?;
    out.write_all(b"MTrk")?;
    out.write_u32::<BigEndian>(track_len)?;
    out.write_all(&track)?;

    if out.len() != HEADER_BYTES + track_len as usize {
        return Err(ExportError::encoding(format!(
            "MIDI size mismatch: wrote {} bytes, expected {}",
            out.len(),
            HEADER_BYTES + track_len as usize
        )));
    }

    debug!(
        sequence = %sequence.name,
        notes = sequence.notes.len(),
        ticks_per_step = tps,
        end_tick,
        bytes = out.len(),
        "wrote MIDI file"
    );
    Ok(out)
}

fn note_events(sequence: &Sequence, tps: u32) -> ExportResult<Vec<NoteEvent>> {
    let step_seconds = sequence.step_duration_seconds();
    let mut events = Vec::with_capacity(sequence.notes.len() * 2);

    for note in &sequence.notes {
        let key = midi_key(note)?;
        let start = note.step as u64 * tps as u64;
        let ticks = (note.duration.to_steps(step_seconds) * tps as f64)
            .round()
            .clamp(1.0, tps as f64) as u64;
        let velocity = midi_velocity(note.velocity);

        events.push(NoteEvent {
            tick: start,
            kind: EventKind::NoteOn,
            key,
            velocity,
        });
        events.push(NoteEvent {
            tick: start + ticks,
            kind: EventKind::NoteOff,
            key,
            velocity: NOTE_OFF_VELOCITY,
        });
    }

    events.sort_by_key(|e| (e.tick, e.kind));
    Ok(events)
}

fn midi_key(note: &Note) -> ExportResult<u8> {
    note.pitch.midi_number().ok_or_else(|| {
        ExportError::unrepresentable(
            "MIDI",
            format!("step {} ({})", note.step, note.pitch),
            format!("note number {} is above 127", note.pitch.number()),
        )
    })
}

fn encode_track(sequence: &Sequence, events: &[NoteEvent], end_tick: u64) -> ExportResult<Vec<u8>> {
    let mut track = Vec::new();

    // Track name
    write_vlq(&mut track, 0)?;
    write_meta(&mut track, META_TRACK_NAME, sequence.name.as_bytes())?;

    // Tempo, 24-bit big endian
    let tempo = micros_per_quarter(sequence.tempo).to_be_bytes();
    write_vlq(&mut track, 0)?;
    write_meta(&mut track, META_SET_TEMPO, &tempo[1..])?;

    // 4/4, 24 clocks per click, 8 32nds per quarter
    write_vlq(&mut track, 0)?;
    write_meta(&mut track, META_TIME_SIGNATURE, &[4, 2, 24, 8])?;

    let mut last_tick = 0u64;
    for event in events {
        write_vlq(&mut track, (event.tick - last_tick) as u32)?;
        let status = match event.kind {
            EventKind::NoteOn => STATUS_NOTE_ON,
            EventKind::NoteOff => STATUS_NOTE_OFF,
        };
        track.write_u8(status | MIDI_CHANNEL)?;
        track.write_u8(event.key)?;
        track.write_u8(event.velocity)?;
        last_tick = event.tick;
    }

    write_vlq(&mut track, (end_tick - last_tick) as u32)?;
    write_meta(&mut track, META_END_OF_TRACK, &[])?;
    Ok(track)
}

fn write_meta<W: Write>(writer: &mut W, kind: u8, data: &[u8]) -> ExportResult<()> {
    let len = u32::try_from(data.len())
        .map_err(|_| ExportError::encoding("meta event too long"))?;
    writer.write_u8(STATUS_META)?;
    writer.write_u8(kind)?;
    write_vlq(writer, len)?;
    writer.write_all(data)?;
    Ok(())
}
