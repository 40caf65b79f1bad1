//! Project metadata persisted as `project.json`.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SAMPLE_RATE;
use crate::sequence::DEFAULT_STEPS;

/// Name of the metadata file at the root of a project directory.
pub const PROJECT_FILE: &str = "project.json";

/// Subdirectories created for every project.
pub const PROJECT_SUBDIRS: [&str; 3] = ["sequences", "exports", "samples"];

/// Project metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Name as typed by the user.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Author name.
    #[serde(default)]
    pub author: String,
    /// Creation timestamp (RFC 3339).
    pub created: String,
    /// Last modification timestamp (RFC 3339).
    pub modified: String,
    /// Names of saved sequences, in save order.
    #[serde(default)]
    pub sequences: Vec<String>,
    /// Project-wide defaults.
    #[serde(default)]
    pub settings: ProjectSettings,
}

impl Project {
    /// Creates metadata for a new project stamped with `timestamp`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        author: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        Self {
            name: name.into(),
            description: description.into(),
            author: author.into(),
            created: timestamp.clone(),
            modified: timestamp,
            sequences: Vec::new(),
            settings: ProjectSettings::default(),
        }
    }

    /// Records a saved sequence and bumps the modification time.
    pub fn touch_sequence(&mut self, sequence: &str, timestamp: impl Into<String>) {
        if !self.sequences.iter().any(|s| s == sequence) {
            self.sequences.push(sequence.to_string());
        }
        self.modified = timestamp.into();
    }
}

/// Project-wide defaults used by the grid and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Default tempo for new sequences.
    pub default_tempo: u16,
    /// Grid columns (steps).
    pub grid_width: u32,
    /// Grid rows (pitches).
    pub grid_height: u32,
    /// Default render sample rate.
    pub sample_rate: u32,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            default_tempo: 120,
            grid_width: DEFAULT_STEPS,
            grid_height: 12,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Turns a display name into a directory name.
///
/// Keeps ASCII alphanumerics, `-`, `_` and spaces, trims trailing spaces and
/// replaces the remaining spaces with underscores. Returns `None` when
/// nothing usable remains.
pub fn sanitize_project_name(name: &str) -> Option<String> {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = kept.trim().replace(' ', "_");
    (!safe.is_empty()).then_some(safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_project_name("My Project"), Some("My_Project".to_string()));
        assert_eq!(sanitize_project_name("a/b..c"), Some("abc".to_string()));
        assert_eq!(sanitize_project_name("  ../  "), None);
    }

    #[test]
    fn test_touch_sequence_dedupes() {
        let mut project = Project::new("p", "", "", "2024-01-01T00:00:00Z");
        project.touch_sequence("intro", "2024-01-02T00:00:00Z");
        project.touch_sequence("intro", "2024-01-03T00:00:00Z");
        assert_eq!(project.sequences, vec!["intro".to_string()]);
        assert_eq!(project.modified, "2024-01-03T00:00:00Z");
        assert_eq!(project.created, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_settings_defaults_in_json() {
        let project = Project::new("p", "d", "a", "t");
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["settings"]["default_tempo"], 120);
        assert_eq!(value["settings"]["grid_width"], 16);
        assert_eq!(value["settings"]["grid_height"], 12);
        assert_eq!(value["settings"]["sample_rate"], 44100);
    }
}
