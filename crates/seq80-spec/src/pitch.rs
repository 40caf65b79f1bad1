//! Symbolic pitches and equal-tempered frequency conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Reference frequency for A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// Note number of A4.
pub const A4_NOTE: u8 = 69;

/// Lowest accepted octave.
pub const MIN_OCTAVE: i8 = -1;

/// Highest accepted octave.
pub const MAX_OCTAVE: i8 = 9;

/// Semitone offset of each natural note letter from C.
const SEMITONE_MAP: [(char, i16); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Display names, sharps only.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Highest note number reachable with octave 9 (B9).
const MAX_NOTE: i16 = (MAX_OCTAVE as i16 + 1) * 12 + 11;

/// A pitch on the 12-tone equal-tempered scale.
///
/// Pitches are written as a letter, an optional accidental (`#` or `b`) and
/// an octave between -1 and 9: `C4`, `C#5`, `Bb3`, `G-1`. Note numbers use
/// the MIDI convention (C4 = 60, A4 = 69) but extend past 127 up to B9, so a
/// pitch can be valid here while still being unrepresentable in a MIDI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    number: u8,
}

impl Pitch {
    /// Creates a pitch from a MIDI note number.
    pub fn from_midi(note: u8) -> Self {
        Self { number: note }
    }

    /// Parses a pitch name such as `"C#5"` or `"Bb3"`.
    pub fn parse(input: &str) -> Result<Self, SpecError> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars().peekable();

        let letter = chars
            .next()
            .ok_or_else(|| SpecError::invalid_pitch(input, "empty pitch name"))?
            .to_ascii_uppercase();
        let mut semitone = SEMITONE_MAP
            .iter()
            .find(|(c, _)| *c == letter)
            .map(|(_, s)| *s)
            .ok_or_else(|| {
                SpecError::invalid_pitch(input, format!("'{}' is not a note letter", letter))
            })?;

        match chars.peek() {
            Some('#') => {
                semitone += 1;
                chars.next();
            }
            Some('b') => {
                semitone -= 1;
                chars.next();
            }
            _ => {}
        }

        let octave_str: String = chars.collect();
        if octave_str.is_empty() {
            return Err(SpecError::invalid_pitch(input, "missing octave"));
        }
        let octave: i16 = octave_str.parse().map_err(|_| {
            SpecError::invalid_pitch(input, format!("'{}' is not an octave", octave_str))
        })?;
        if octave < MIN_OCTAVE as i16 || octave > MAX_OCTAVE as i16 {
            return Err(SpecError::invalid_pitch(
                input,
                format!(
                    "octave must be {}..={}, got {}",
                    MIN_OCTAVE, MAX_OCTAVE, octave
                ),
            ));
        }

        let number = (octave + 1) * 12 + semitone;
        if !(0..=MAX_NOTE).contains(&number) {
            return Err(SpecError::invalid_pitch(input, "pitch is outside C-1..B9"));
        }

        Ok(Self {
            number: number as u8,
        })
    }

    /// Returns the note number (C4 = 60). May exceed 127.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Returns the MIDI note number, or `None` above 127.
    pub fn midi_number(&self) -> Option<u8> {
        (self.number <= 127).then_some(self.number)
    }

    /// Returns the octave (-1..=9).
    pub fn octave(&self) -> i8 {
        (self.number / 12) as i8 - 1
    }

    /// Returns the pitch class name with sharps (e.g., "C#").
    pub fn class_name(&self) -> &'static str {
        NOTE_NAMES[(self.number % 12) as usize]
    }

    /// Returns the equal-tempered frequency in Hz (A4 = 440 Hz).
    pub fn frequency(&self) -> f64 {
        note_to_frequency(self.number)
    }
}

/// Converts a note number to frequency: f = 440 * 2^((n - 69) / 12).
///
/// # Examples
/// ```
/// use seq80_spec::pitch::note_to_frequency;
///
/// assert!((note_to_frequency(69) - 440.0).abs() < 1e-9);
/// assert!((note_to_frequency(60) - 261.6256).abs() < 1e-3);
/// ```
pub fn note_to_frequency(note: u8) -> f64 {
    A4_FREQUENCY * 2.0_f64.powf((note as f64 - A4_NOTE as f64) / 12.0)
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class_name(), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s)
    }
}

impl TryFrom<String> for Pitch {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pitch::parse(&value)
    }
}

impl From<Pitch> for String {
    fn from(pitch: Pitch) -> Self {
        pitch.to_string()
    }
}
