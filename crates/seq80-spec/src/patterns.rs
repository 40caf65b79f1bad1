//! Built-in and user-defined note patterns.
//!
//! A pattern is a named melody with one pitch per step. Custom patterns live
//! in a `custom_patterns.json` file (an object keyed by pattern id) inside a
//! caller-chosen directory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::note::Note;
use crate::pitch::Pitch;
use crate::sequence::{Sequence, DEFAULT_STEPS_PER_BEAT};

/// File name used for custom patterns inside a pattern directory.
pub const CUSTOM_PATTERNS_FILE: &str = "custom_patterns.json";

/// A named melody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// One pitch per step.
    pub notes: Vec<Pitch>,
    /// Tempo in BPM.
    pub tempo: u16,
    /// Grouping used for listing.
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "custom".to_string()
}

impl Pattern {
    /// Converts the pattern into a sequence with one note per step.
    ///
    /// The step count is rounded up to a whole number of beats.
    pub fn to_sequence(&self) -> Sequence {
        let beat = DEFAULT_STEPS_PER_BEAT as usize;
        let steps = self.notes.len().max(1).div_ceil(beat) * beat;
        self.notes.iter().enumerate().fold(
            Sequence::new(self.name.clone(), self.tempo, steps as u32),
            |seq, (step, pitch)| seq.with_note(Note::new(*pitch, step as u32)),
        )
    }
}

/// Lookup over built-in and custom patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    builtin: BTreeMap<String, Pattern>,
    custom: BTreeMap<String, Pattern>,
}

impl PatternLibrary {
    /// Creates a library holding only the built-in patterns.
    pub fn new() -> Self {
        Self {
            builtin: builtin_patterns(),
            custom: BTreeMap::new(),
        }
    }

    /// Creates a library with built-ins plus custom patterns from `dir`.
    ///
    /// A missing custom file is not an error.
    pub fn with_custom_dir(dir: &Path) -> SpecResult<Self> {
        let mut lib = Self::new();
        let path = dir.join(CUSTOM_PATTERNS_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            lib.custom = serde_json::from_str(&content)?;
        }
        Ok(lib)
    }

    /// Looks a pattern up by id; custom patterns shadow built-ins.
    pub fn get(&self, id: &str) -> Option<&Pattern> {
        self.custom.get(id).or_else(|| self.builtin.get(id))
    }

    /// Looks a pattern up by id, failing with [`SpecError::UnknownPattern`].
    pub fn require(&self, id: &str) -> SpecResult<&Pattern> {
        self.get(id)
            .ok_or_else(|| SpecError::UnknownPattern(id.to_string()))
    }

    /// Lists pattern ids, optionally restricted to one category.
    pub fn list(&self, category: Option<&str>) -> Vec<&str> {
        let ids: BTreeSet<&str> = self
            .builtin
            .iter()
            .chain(self.custom.iter())
            .filter(|(_, p)| category.map_or(true, |c| p.category == c))
            .map(|(id, _)| id.as_str())
            .collect();
        ids.into_iter().collect()
    }

    /// Lists distinct categories in sorted order.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .builtin
            .values()
            .chain(self.custom.values())
            .map(|p| p.category.as_str())
            .collect();
        set.into_iter().collect()
    }

    /// Adds a custom pattern and rewrites the custom file in `dir`.
    pub fn save_custom(&mut self, dir: &Path, id: &str, pattern: Pattern) -> SpecResult<()> {
        if pattern.notes.is_empty() {
            return Err(SpecError::invalid_param(
                "pattern.notes",
                "must contain at least one pitch",
            ));
        }
        pattern.to_sequence().validate()?;
        self.custom.insert(id.to_string(), pattern);
        fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(&self.custom)?;
        fs::write(dir.join(CUSTOM_PATTERNS_FILE), json)?;
        Ok(())
    }
}

fn builtin(
    name: &str,
    description: &str,
    notes: &[&str],
    tempo: u16,
    category: &str,
) -> Pattern {
    Pattern {
        name: name.to_string(),
        description: description.to_string(),
        notes: notes
            .iter()
            .filter_map(|n| Pitch::parse(n).ok())
            .collect(),
        tempo,
        category: category.to_string(),
    }
}

fn builtin_patterns() -> BTreeMap<String, Pattern> {
    [
        (
            "c_major_scale",
            builtin(
                "C Major Scale",
                "Ascending C major scale",
                &["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"],
                120,
                "scales",
            ),
        ),
        (
            "c_major_arpeggio",
            builtin(
                "C Major Arpeggio",
                "C major chord arpeggio",
                &["C4", "E4", "G4", "C5", "G4", "E4", "C4"],
                120,
                "arpeggios",
            ),
        ),
        (
            "blues_lick",
            builtin(
                "Blues Lick",
                "Classic blues phrase in C",
                &["C4", "E4", "F4", "F#4", "G4", "A4", "B4", "C5"],
                100,
                "blues",
            ),
        ),
        (
            "pentatonic",
            builtin(
                "C Pentatonic",
                "C major pentatonic scale",
                &["C4", "D4", "E4", "G4", "A4", "C5"],
                120,
                "scales",
            ),
        ),
        (
            "bass_line",
            builtin(
                "Walking Bass",
                "Walking bass line in C",
                &["C3", "E3", "F3", "G3", "A3", "B3", "C4"],
                140,
                "bass",
            ),
        ),
        (
            "chiptune_melody",
            builtin(
                "Chiptune Melody",
                "8-bit style melody",
                &["C5", "D5", "E5", "G5", "A5", "G5", "E5", "C5"],
                150,
                "melodies",
            ),
        ),
        (
            "ambient_pad",
            builtin(
                "Ambient Pad",
                "Slow ambient progression",
                &["C4", "F4", "A4", "C5"],
                80,
                "ambient",
            ),
        ),
    ]
    .into_iter()
    .map(|(id, p)| (id.to_string(), p))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_are_valid_sequences() {
        let lib = PatternLibrary::new();
        let ids = lib.list(None);
        assert_eq!(ids.len(), 7);
        for id in ids {
            let pattern = lib.get(id).unwrap();
            let seq = pattern.to_sequence();
            assert!(seq.validate().is_ok(), "{} failed validation", id);
            assert_eq!(seq.notes.len(), pattern.notes.len());
        }
    }

    #[test]
    fn test_to_sequence_rounds_to_beats() {
        let lib = PatternLibrary::new();
        let arp = lib.require("c_major_arpeggio").unwrap().to_sequence();
        assert_eq!(arp.steps, 8);
        assert_eq!(arp.tempo, 120);
        assert_eq!(arp.note_at(3).unwrap().pitch.to_string(), "C5");
        assert!(arp.note_at(7).is_none());
    }

    #[test]
    fn test_list_by_category() {
        let lib = PatternLibrary::new();
        assert_eq!(lib.list(Some("scales")), vec!["c_major_scale", "pentatonic"]);
        assert!(lib.list(Some("polka")).is_empty());
    }

    #[test]
    fn test_categories_sorted() {
        let lib = PatternLibrary::new();
        assert_eq!(
            lib.categories(),
            vec!["ambient", "arpeggios", "bass", "blues", "melodies", "scales"]
        );
    }

    #[test]
    fn test_unknown_pattern() {
        let lib = PatternLibrary::new();
        assert!(matches!(
            lib.require("nope"),
            Err(SpecError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_custom_patterns_persist() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("patterns");

        let mut lib = PatternLibrary::with_custom_dir(&dir).unwrap();
        let pattern = Pattern {
            name: "Riff".to_string(),
            description: "test riff".to_string(),
            notes: vec![Pitch::parse("E2").unwrap(), Pitch::parse("G2").unwrap()],
            tempo: 96,
            category: "custom".to_string(),
        };
        lib.save_custom(&dir, "riff", pattern.clone()).unwrap();

        let reloaded = PatternLibrary::with_custom_dir(&dir).unwrap();
        assert_eq!(reloaded.get("riff"), Some(&pattern));
        assert!(reloaded.categories().contains(&"custom"));
    }

    #[test]
    fn test_save_custom_rejects_bad_tempo() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let mut lib = PatternLibrary::new();
        let pattern = Pattern {
            name: "Too fast".to_string(),
            description: String::new(),
            notes: vec![Pitch::parse("C4").unwrap()],
            tempo: 400,
            category: "custom".to_string(),
        };
        assert!(lib.save_custom(dir, "fast", pattern).is_err());
        assert!(lib.get("fast").is_none());
    }
}
