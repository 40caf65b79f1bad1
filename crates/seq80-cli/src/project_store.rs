//! On-disk project directories.
//!
//! ```text
//! projects/
//!   My_Song/
//!     project.json
//!     sequences/intro.json
//!     exports/
//!     samples/
//!   .backups/
//!     My_Song_backup_20240101_120000/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use seq80_backend_export::{export_json, import_sequence};
use seq80_spec::project::{PROJECT_FILE, PROJECT_SUBDIRS};
use seq80_spec::{sanitize_project_name, Project, Sequence};
use tracing::debug;
use walkdir::WalkDir;

use crate::output::write_atomic;

/// Default directory holding all projects.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// Subdirectory of the store root holding project backups. Project names
/// cannot contain dots, so it never collides with a project.
pub const BACKUPS_DIR: &str = ".backups";

/// A directory of projects.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Opens the store rooted at `root`. Nothing is created until a project is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a project, from its display name.
    pub fn project_dir(&self, name: &str) -> Result<PathBuf> {
        let safe = sanitize_project_name(name)
            .with_context(|| format!("Invalid project name: '{}'", name))?;
        Ok(self.root.join(safe))
    }

    /// Creates a project directory with its metadata and subdirectories.
    pub fn create(&self, name: &str, description: &str, author: &str) -> Result<Project> {
        let dir = self.project_dir(name)?;
        if dir.join(PROJECT_FILE).exists() {
            bail!("Project '{}' already exists at {}", name, dir.display());
        }
        for sub in PROJECT_SUBDIRS {
            fs::create_dir_all(dir.join(sub))
                .with_context(|| format!("Failed to create directory: {}", dir.join(sub).display()))?;
        }

        let project = Project::new(name, description, author, timestamp());
        self.write_metadata(&dir, &project)?;
        debug!(project = name, dir = %dir.display(), "created project");
        Ok(project)
    }

    /// Reads a project's metadata.
    pub fn open(&self, name: &str) -> Result<Project> {
        let path = self.project_dir(name)?.join(PROJECT_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Project '{}' not found ({})", name, path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project file: {}", path.display()))
    }

    /// Lists project directory names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read directory: {}", self.root.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.join(PROJECT_FILE).is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Saves a sequence under `sequences/<name>.json` and records it in the
    /// project metadata. Saving under an existing name replaces it.
    pub fn save_sequence(&self, project: &str, sequence: &Sequence) -> Result<PathBuf> {
        let dir = self.project_dir(project)?;
        let mut metadata = self.open(project)?;
        let file_name = sanitize_project_name(&sequence.name)
            .with_context(|| format!("Invalid sequence name: '{}'", sequence.name))?;

        let path = dir.join("sequences").join(format!("{}.json", file_name));
        let bytes = export_json(sequence, None)
            .with_context(|| format!("Failed to serialize sequence '{}'", sequence.name))?;
        write_atomic(&path, &bytes)?;

        metadata.touch_sequence(&file_name, timestamp());
        self.write_metadata(&dir, &metadata)?;
        debug!(project, sequence = %file_name, "saved sequence");
        Ok(path)
    }

    /// Loads a saved sequence.
    pub fn load_sequence(&self, project: &str, sequence: &str) -> Result<Sequence> {
        let path = self.sequence_path(project, sequence)?;
        let bytes = fs::read(&path).with_context(|| {
            format!("Sequence '{}' not found in project '{}'", sequence, project)
        })?;
        import_sequence(&bytes)
            .with_context(|| format!("Failed to load sequence: {}", path.display()))
    }

    /// Deletes a saved sequence and drops it from the metadata.
    pub fn remove_sequence(&self, project: &str, sequence: &str) -> Result<()> {
        let dir = self.project_dir(project)?;
        let mut metadata = self.open(project)?;
        let path = self.sequence_path(project, sequence)?;
        if !path.exists() {
            bail!("Sequence '{}' not found in project '{}'", sequence, project);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove: {}", path.display()))?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(sequence);
        metadata.sequences.retain(|s| s != stem);
        metadata.modified = timestamp();
        self.write_metadata(&dir, &metadata)
    }

    /// Deletes a project directory and everything in it. Backups are kept.
    pub fn delete(&self, name: &str) -> Result<PathBuf> {
        let dir = self.existing_project_dir(name)?;
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to delete project: {}", dir.display()))?;
        debug!(project = name, dir = %dir.display(), "deleted project");
        Ok(dir)
    }

    /// Copies a project to `.backups/<project>_backup_<YYYYmmdd_HHMMSS>` and
    /// returns the backup directory. A second backup within the same second
    /// gets a numeric suffix.
    pub fn backup(&self, name: &str) -> Result<PathBuf> {
        let dir = self.existing_project_dir(name)?;
        let safe = sanitize_project_name(name)
            .with_context(|| format!("Invalid project name: '{}'", name))?;
        let base = format!("{}_backup_{}", safe, Utc::now().format("%Y%m%d_%H%M%S"));

        let backups = self.root.join(BACKUPS_DIR);
        let mut target = backups.join(&base);
        let mut n = 2;
        while target.exists() {
            target = backups.join(format!("{}_{}", base, n));
            n += 1;
        }

        copy_dir(&dir, &target)?;
        debug!(project = name, backup = %target.display(), "backed up project");
        Ok(target)
    }

    fn existing_project_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.project_dir(name)?;
        if !dir.join(PROJECT_FILE).is_file() {
            bail!("Project '{}' not found ({})", name, dir.display());
        }
        Ok(dir)
    }

    fn sequence_path(&self, project: &str, sequence: &str) -> Result<PathBuf> {
        let file_name = sanitize_project_name(sequence)
            .with_context(|| format!("Invalid sequence name: '{}'", sequence))?;
        Ok(self
            .project_dir(project)?
            .join("sequences")
            .join(format!("{}.json", file_name)))
    }

    fn write_metadata(&self, dir: &Path, project: &Project) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(project).context("Failed to serialize project")?;
        json.push(b'\n');
        write_atomic(&dir.join(PROJECT_FILE), &json)
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECTS_DIR)
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Recursively copies `src` to `dst`. Symlinks are skipped.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to read directory: {}", src.display()))?;
        let target = dst.join(entry.path().strip_prefix(src)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}
