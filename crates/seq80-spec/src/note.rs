//! Note events placed on the step grid.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::pitch::Pitch;

/// How long a note sounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteDuration {
    /// Length as a fraction (or multiple) of one step.
    Steps(f64),
    /// Absolute length in seconds.
    Seconds(f64),
}

impl Default for NoteDuration {
    fn default() -> Self {
        NoteDuration::Steps(1.0)
    }
}

impl NoteDuration {
    /// Converts the duration to seconds for a given step length.
    pub fn to_seconds(&self, step_seconds: f64) -> f64 {
        match *self {
            NoteDuration::Steps(steps) => steps * step_seconds,
            NoteDuration::Seconds(seconds) => seconds,
        }
    }

    /// Converts the duration to a number of steps for a given step length.
    pub fn to_steps(&self, step_seconds: f64) -> f64 {
        match *self {
            NoteDuration::Steps(steps) => steps,
            NoteDuration::Seconds(seconds) => seconds / step_seconds,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            NoteDuration::Steps(v) | NoteDuration::Seconds(v) => v,
        }
    }
}

/// A single note on the grid.
///
/// The frequency is never stored; it is always derived from `pitch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Symbolic pitch (e.g., "C#5").
    pub pitch: Pitch,
    /// Zero-based step index.
    pub step: u32,
    /// Sounding length; defaults to one full step.
    #[serde(default)]
    pub duration: NoteDuration,
    /// Normalized velocity (0.0-1.0).
    #[serde(default = "default_velocity")]
    pub velocity: f64,
}

fn default_velocity() -> f64 {
    DEFAULT_VELOCITY
}

/// Velocity used when none is given (MIDI velocity 100).
pub const DEFAULT_VELOCITY: f64 = 100.0 / 127.0;

impl Note {
    /// Creates a full-step note with the default velocity.
    pub fn new(pitch: Pitch, step: u32) -> Self {
        Self {
            pitch,
            step,
            duration: NoteDuration::default(),
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Sets the velocity.
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: NoteDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns the equal-tempered frequency of the pitch in Hz.
    pub fn frequency(&self) -> f64 {
        self.pitch.frequency()
    }

    /// Checks velocity and duration ranges.
    pub fn validate(&self) -> SpecResult<()> {
        if !self.velocity.is_finite() || !(0.0..=1.0).contains(&self.velocity) {
            return Err(SpecError::invalid_param(
                format!("notes[step {}].velocity", self.step),
                format!("must be 0.0-1.0, got {}", self.velocity),
            ));
        }
        let duration = self.duration.value();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SpecError::invalid_param(
                format!("notes[step {}].duration", self.step),
                format!("must be positive, got {}", duration),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c4() -> Pitch {
        Pitch::parse("C4").unwrap()
    }

    #[test]
    fn test_note_defaults() {
        let note = Note::new(c4(), 3);
        assert_eq!(note.duration, NoteDuration::Steps(1.0));
        assert!((note.velocity - 100.0 / 127.0).abs() < 1e-12);
        assert!(note.validate().is_ok());
    }

    #[test]
    fn test_note_deserialize_defaults() {
        let note: Note = serde_json::from_str(r#"{"pitch": "E4", "step": 2}"#).unwrap();
        assert_eq!(note.pitch.to_string(), "E4");
        assert_eq!(note.duration, NoteDuration::default());
        assert_eq!(note.velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn test_duration_serde_shape() {
        let json = serde_json::to_string(&NoteDuration::Seconds(0.25)).unwrap();
        assert_eq!(json, r#"{"seconds":0.25}"#);
        let json = serde_json::to_string(&NoteDuration::Steps(0.5)).unwrap();
        assert_eq!(json, r#"{"steps":0.5}"#);
    }

    #[test]
    fn test_duration_conversion() {
        assert!((NoteDuration::Steps(0.5).to_seconds(0.125) - 0.0625).abs() < 1e-12);
        assert!((NoteDuration::Seconds(0.25).to_steps(0.125) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_velocity() {
        let err = Note::new(c4(), 1).with_velocity(1.5).validate().unwrap_err();
        assert!(err.to_string().contains("velocity"));
        assert!(Note::new(c4(), 1)
            .with_velocity(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        assert!(Note::new(c4(), 0)
            .with_duration(NoteDuration::Steps(0.0))
            .validate()
            .is_err());
        assert!(Note::new(c4(), 0)
            .with_duration(NoteDuration::Seconds(-1.0))
            .validate()
            .is_err());
    }
}
