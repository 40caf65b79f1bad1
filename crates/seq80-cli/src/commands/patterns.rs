//! Patterns command implementation
//!
//! Lists, shows and creates melody patterns. Custom patterns live in
//! `custom_patterns.json` inside the patterns directory.

use anyhow::{Context, Result};
use colored::Colorize;
use seq80_backend_export::export_json;
use seq80_spec::{Pattern, PatternLibrary, Pitch};
use std::path::Path;
use std::process::ExitCode;

use crate::output::write_atomic;

/// Default directory for custom patterns.
pub const DEFAULT_PATTERNS_DIR: &str = "patterns";

fn load_library(dir: &Path) -> Result<PatternLibrary> {
    PatternLibrary::with_custom_dir(dir)
        .with_context(|| format!("Failed to load custom patterns from: {}", dir.display()))
}

/// Run `patterns list`
pub fn list(dir: &Path, category: Option<&str>) -> Result<ExitCode> {
    let library = load_library(dir)?;
    let ids = library.list(category);

    match category {
        Some(c) => println!("{} '{}':", "Patterns in category".cyan().bold(), c),
        None => println!("{}", "All available patterns:".cyan().bold()),
    }
    if ids.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for id in ids {
        if let Some(pattern) = library.get(id) {
            println!("  {}: {} - {}", id.bold(), pattern.name, pattern.description);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `patterns show`
///
/// With `save`, also writes the pattern as a sequence document that the
/// `render` and `export` commands accept.
pub fn show(dir: &Path, id: &str, save: Option<&str>) -> Result<ExitCode> {
    let library = load_library(dir)?;
    let pattern = library.require(id)?;

    let notes: Vec<String> = pattern.notes.iter().map(|p| p.to_string()).collect();
    println!("{} {}", "Pattern:".cyan().bold(), pattern.name);
    println!("{} {}", "Description:".dimmed(), pattern.description);
    println!("{} {}", "Category:".dimmed(), pattern.category);
    println!("{} {} BPM", "Tempo:".dimmed(), pattern.tempo);
    println!("{} {}", "Notes:".dimmed(), notes.join(" "));

    if let Some(path) = save {
        let sequence = pattern.to_sequence();
        let bytes = export_json(&sequence, None)
            .with_context(|| format!("Failed to convert pattern '{}' to a sequence", id))?;
        write_atomic(Path::new(path), &bytes)?;
        println!("{} Sequence written to: {}", "SUCCESS".green().bold(), path);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `patterns categories`
pub fn categories(dir: &Path) -> Result<ExitCode> {
    let library = load_library(dir)?;
    println!("{}", "Available categories:".cyan().bold());
    for category in library.categories() {
        println!("  {}", category);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `patterns create`
pub fn create(
    dir: &Path,
    id: &str,
    notes: &[String],
    tempo: u16,
    description: &str,
    category: &str,
) -> Result<ExitCode> {
    let pitches = notes
        .iter()
        .map(|n| Pitch::parse(n))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid note in --notes")?;

    let pattern = Pattern {
        name: id.to_string(),
        description: description.to_string(),
        notes: pitches,
        tempo,
        category: category.to_string(),
    };

    let mut library = load_library(dir)?;
    library
        .save_custom(dir, id, pattern)
        .with_context(|| format!("Failed to create pattern '{}'", id))?;

    println!("{} Pattern '{}' created", "SUCCESS".green().bold(), id);
    Ok(ExitCode::SUCCESS)
}
