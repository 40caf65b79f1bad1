//! SMF reader used to verify written files and inspect foreign ones.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use super::{
    read_vlq, truncated, META_END_OF_TRACK, META_SET_TEMPO, META_TIME_SIGNATURE,
    META_TRACK_NAME, STATUS_META, STATUS_NOTE_OFF, STATUS_NOTE_ON,
};
use crate::error::{ExportError, ExportResult};

/// A note decoded from a MIDI file, with its Note-Off already paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiNote {
    /// Absolute start tick.
    pub tick: u64,
    /// MIDI note number.
    pub pitch: u8,
    /// Note-On velocity.
    pub velocity: u8,
    /// Length in ticks.
    pub length: u64,
    /// Channel (0-15).
    pub channel: u8,
}

/// Contents of a decoded Standard MIDI File.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiFile {
    /// SMF format (0, 1 or 2).
    pub format: u16,
    /// Number of `MTrk` chunks.
    pub tracks: u16,
    /// Ticks per quarter note.
    pub ppq: u16,
    /// First track name meta event.
    pub track_name: Option<String>,
    /// First set-tempo meta event.
    pub micros_per_quarter: Option<u32>,
    /// First time signature as (numerator, denominator).
    pub time_signature: Option<(u8, u8)>,
    /// Notes ordered by tick, then pitch.
    pub notes: Vec<MidiNote>,
    /// Tick of the latest End-of-Track event.
    pub end_tick: u64,
}

impl MidiFile {
    /// Tempo in BPM, if the file sets one.
    pub fn tempo_bpm(&self) -> Option<f64> {
        self.micros_per_quarter
            .filter(|&m| m > 0)
            .map(|m| 60_000_000.0 / m as f64)
    }

    /// Note numbers in playing order.
    pub fn pitches(&self) -> Vec<u8> {
        self.notes.iter().map(|n| n.pitch).collect()
    }
}

#[derive(Debug, Default)]
struct TrackState {
    track_name: Option<String>,
    micros_per_quarter: Option<u32>,
    time_signature: Option<(u8, u8)>,
    notes: Vec<MidiNote>,
    end_tick: u64,
}

/// Decodes a Standard MIDI File.
///
/// Unknown chunks are skipped. Notes still sounding at End-of-Track are
/// closed there.
///
/// # Errors
/// [`ExportError::InvalidMidi`] for a missing header, truncated chunks, a
/// track without End-of-Track, SMPTE time division, or data bytes with no
/// running status.
pub fn read_midi(bytes: &[u8]) -> ExportResult<MidiFile> {
    let mut cursor = Cursor::new(bytes);

    let (id, header) = read_chunk(&mut cursor, bytes)?
        .ok_or_else(|| ExportError::invalid_midi("empty file"))?;
    if id != *b"MThd" {
        return Err(ExportError::invalid_midi("missing MThd header chunk"));
    }
    if header.len() < 6 {
        return Err(ExportError::invalid_midi(format!(
            "header chunk is {} bytes, expected 6",
            header.len()
        )));
    }
    let mut header = Cursor::new(header);
    let format = header.read_u16::<BigEndian>()?;
    let tracks = header.read_u16::<BigEndian>()?;
    let division = header.read_u16::<BigEndian>()?;
    if division & 0x8000 != 0 {
        return Err(ExportError::invalid_midi("SMPTE time division is not supported"));
    }

    let mut state = TrackState::default();
    let mut found = 0u16;
    while let Some((id, data)) = read_chunk(&mut cursor, bytes)? {
        if id == *b"MTrk" {
            read_track(data, &mut state)?;
            found += 1;
        }
    }
    if found != tracks {
        return Err(ExportError::invalid_midi(format!(
            "header declares {} tracks, found {}",
            tracks, found
        )));
    }

    state.notes.sort_by_key(|n| (n.tick, n.pitch));
    Ok(MidiFile {
        format,
        tracks,
        ppq: division,
        track_name: state.track_name,
        micros_per_quarter: state.micros_per_quarter,
        time_signature: state.time_signature,
        notes: state.notes,
        end_tick: state.end_tick,
    })
}

/// Reads the next chunk, or `None` at end of input.
fn read_chunk<'a>(
    cursor: &mut Cursor<&'a [u8]>,
    bytes: &'a [u8],
) -> ExportResult<Option<([u8; 4], &'a [u8])>> {
    let start = cursor.position() as usize;
    if start >= bytes.len() {
        return Ok(None);
    }
    let mut id = [0u8; 4];
    cursor
        .read_exact(&mut id)
        .map_err(|_| truncated("chunk header"))?;
    let len = cursor
        .read_u32::<BigEndian>()
        .map_err(|_| truncated("chunk header"))? as usize;
    let data_start = start + 8;
    let data_end = data_start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            ExportError::invalid_midi(format!(
                "chunk '{}' declares {} bytes but only {} remain",
                String::from_utf8_lossy(&id),
                len,
                bytes.len() - data_start
            ))
        })?;
    cursor.set_position(data_end as u64);
    Ok(Some((id, &bytes[data_start..data_end])))
}

fn read_track(data: &[u8], state: &mut TrackState) -> ExportResult<()> {
    let mut cursor = Cursor::new(data);
    let mut tick = 0u64;
    let mut running_status: Option<u8> = None;
    let mut sounding: HashMap<(u8, u8), (u64, u8)> = HashMap::new();

    loop {
        if cursor.position() as usize >= data.len() {
            return Err(ExportError::invalid_midi("track ends without End-of-Track"));
        }
        tick += read_vlq(&mut cursor)? as u64;

        let first = cursor.read_u8().map_err(|_| truncated("event"))?;
        let (status, first_data) = if first & 0x80 != 0 {
            (first, None)
        } else {
            let status = running_status.ok_or_else(|| {
                ExportError::invalid_midi("data byte without running status")
            })?;
            (status, Some(first))
        };

        match status {
            STATUS_META => {
                running_status = None;
                let kind = cursor.read_u8().map_err(|_| truncated("meta event"))?;
                let payload = read_payload(&mut cursor)?;
                match kind {
                    META_END_OF_TRACK => {
                        close_sounding(&mut sounding, tick, &mut state.notes);
                        state.end_tick = state.end_tick.max(tick);
                        return Ok(());
                    }
                    META_TRACK_NAME if state.track_name.is_none() => {
                        state.track_name = Some(String::from_utf8_lossy(&payload).into_owned());
                    }
                    META_SET_TEMPO if state.micros_per_quarter.is_none() => {
                        if payload.len() != 3 {
                            return Err(ExportError::invalid_midi("set-tempo payload is not 3 bytes"));
                        }
                        state.micros_per_quarter = Some(
                            (payload[0] as u32) << 16 | (payload[1] as u32) << 8 | payload[2] as u32,
                        );
                    }
                    META_TIME_SIGNATURE if state.time_signature.is_none() => {
                        if payload.len() < 2 || payload[1] > 7 {
                            return Err(ExportError::invalid_midi("malformed time signature"));
                        }
                        state.time_signature = Some((payload[0], 1u8 << payload[1]));
                    }
                    _ => {}
                }
            }
            0xF0 | 0xF7 => {
                running_status = None;
                read_payload(&mut cursor)?;
            }
            _ => {
                running_status = Some(status);
                let channel = status & 0x0F;
                let a = match first_data {
                    Some(byte) => byte,
                    None => data_byte(&mut cursor)?,
                };
                match status & 0xF0 {
                    STATUS_NOTE_ON | STATUS_NOTE_OFF => {
                        let velocity = data_byte(&mut cursor)?;
                        if status & 0xF0 == STATUS_NOTE_ON && velocity > 0 {
                            // A retrigger closes the sounding note first
                            if let Some((start, vel)) = sounding.remove(&(channel, a)) {
                                state.notes.push(note(channel, a, start, vel, tick));
                            }
                            sounding.insert((channel, a), (tick, velocity));
                        } else if let Some((start, vel)) = sounding.remove(&(channel, a)) {
                            state.notes.push(note(channel, a, start, vel, tick));
                        }
                    }
                    0xC0 | 0xD0 => {}
                    _ => {
                        data_byte(&mut cursor)?;
                    }
                }
            }
        }
    }
}

fn data_byte(cursor: &mut Cursor<&[u8]>) -> ExportResult<u8> {
    let byte = cursor.read_u8().map_err(|_| truncated("channel event"))?;
    Ok(byte & 0x7F)
}

/// Reads a length-prefixed payload, checking the declared length against
/// the bytes left in the track before copying.
fn read_payload(cursor: &mut Cursor<&[u8]>) -> ExportResult<Vec<u8>> {
    let len = read_vlq(cursor)? as usize;
    let data = *cursor.get_ref();
    let start = cursor.position() as usize;
    let payload = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| truncated("event payload"))?;
    cursor.set_position((start + len) as u64);
    Ok(payload.to_vec())
}

fn note(channel: u8, pitch: u8, start: u64, velocity: u8, end: u64) -> MidiNote {
    MidiNote {
        tick: start,
        pitch,
        velocity,
        length: end - start,
        channel,
    }
}

fn close_sounding(
    sounding: &mut HashMap<(u8, u8), (u64, u8)>,
    tick: u64,
    notes: &mut Vec<MidiNote>,
) {
    for ((channel, pitch), (start, velocity)) in sounding.drain() {
        notes.push(note(channel, pitch, start, velocity, tick));
    }
}
