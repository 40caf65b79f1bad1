//! Note sequences and their validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::note::Note;

/// Slowest accepted tempo in BPM.
pub const MIN_TEMPO: u16 = 60;

/// Fastest accepted tempo in BPM.
pub const MAX_TEMPO: u16 = 200;

/// Steps in the canonical grid.
pub const DEFAULT_STEPS: u32 = 16;

/// Longest accepted grid. Bounds every per-step listing and allocation.
pub const MAX_STEPS: u32 = 65_536;

/// Sixteenth-note steps.
pub const DEFAULT_STEPS_PER_BEAT: u32 = 4;

/// Upper bound on `steps_per_beat`.
pub const MAX_STEPS_PER_BEAT: u32 = 16;

/// A single-voice step sequence.
///
/// Each step holds at most one note. Notes are kept in step order when added
/// through [`Sequence::with_note`]; deserialized sequences keep the order they
/// were written in, and every consumer looks notes up by step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    /// Display name.
    pub name: String,
    /// Tempo in BPM (60-200).
    pub tempo: u16,
    /// Number of steps in the sequence.
    pub steps: u32,
    /// Steps per quarter-note beat.
    #[serde(default = "default_steps_per_beat")]
    pub steps_per_beat: u32,
    /// The notes.
    #[serde(default)]
    pub notes: Vec<Note>,
}

fn default_steps_per_beat() -> u32 {
    DEFAULT_STEPS_PER_BEAT
}

impl Sequence {
    /// Creates an empty sequence.
    pub fn new(name: impl Into<String>, tempo: u16, steps: u32) -> Self {
        Self {
            name: name.into(),
            tempo,
            steps,
            steps_per_beat: DEFAULT_STEPS_PER_BEAT,
            notes: Vec::new(),
        }
    }

    /// Adds a note, keeping notes ordered by step.
    pub fn with_note(mut self, note: Note) -> Self {
        let idx = self.notes.partition_point(|n| n.step <= note.step);
        self.notes.insert(idx, note);
        self
    }

    /// Sets the number of steps per beat.
    pub fn with_steps_per_beat(mut self, steps_per_beat: u32) -> Self {
        self.steps_per_beat = steps_per_beat;
        self
    }

    /// Length of one step in seconds: 60 / tempo / steps_per_beat.
    pub fn step_duration_seconds(&self) -> f64 {
        60.0 / self.tempo as f64 / self.steps_per_beat as f64
    }

    /// Total length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.steps as f64 * self.step_duration_seconds()
    }

    /// Returns the note at `step`, if any.
    pub fn note_at(&self, step: u32) -> Option<&Note> {
        self.notes.iter().find(|n| n.step == step)
    }

    /// Returns one slot per step, holding the note played on that step.
    ///
    /// Notes past the last step are ignored; call [`Sequence::validate`]
    /// first to reject them.
    pub fn step_slots(&self) -> Vec<Option<&Note>> {
        let mut slots = vec![None; self.steps as usize];
        for note in &self.notes {
            if let Some(slot) = slots.get_mut(note.step as usize) {
                *slot = Some(note);
            }
        }
        slots
    }

    /// Validates tempo, grid shape and every note.
    pub fn validate(&self) -> SpecResult<()> {
        if !(MIN_TEMPO..=MAX_TEMPO).contains(&self.tempo) {
            return Err(SpecError::invalid_param(
                "sequence.tempo",
                format!(
                    "must be {}-{} BPM, got {}",
                    MIN_TEMPO, MAX_TEMPO, self.tempo
                ),
            ));
        }
        if !(1..=MAX_STEPS).contains(&self.steps) {
            return Err(SpecError::invalid_param(
                "sequence.steps",
                format!("must be 1-{}, got {}", MAX_STEPS, self.steps),
            ));
        }
        if !(1..=MAX_STEPS_PER_BEAT).contains(&self.steps_per_beat) {
            return Err(SpecError::invalid_param(
                "sequence.steps_per_beat",
                format!(
                    "must be 1-{}, got {}",
                    MAX_STEPS_PER_BEAT, self.steps_per_beat
                ),
            ));
        }

        let mut occupied = BTreeSet::new();
        for note in &self.notes {
            if note.step >= self.steps {
                return Err(SpecError::StepOutOfRange {
                    step: note.step,
                    steps: self.steps,
                });
            }
            if !occupied.insert(note.step) {
                return Err(SpecError::DuplicateStep { step: note.step });
            }
            note.validate()?;
        }
        Ok(())
    }
}
