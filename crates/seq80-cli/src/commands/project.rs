//! Project command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::input::load_sequence;
use crate::project_store::ProjectStore;

/// Run `project create`
pub fn create(root: &Path, name: &str, description: &str, author: &str) -> Result<ExitCode> {
    let store = ProjectStore::new(root);
    store.create(name, description, author)?;
    println!(
        "{} Project '{}' created at {}",
        "SUCCESS".green().bold(),
        name,
        store.project_dir(name)?.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run `project list`
pub fn list(root: &Path) -> Result<ExitCode> {
    let store = ProjectStore::new(root);
    let names = store.list()?;
    if names.is_empty() {
        println!("No projects found in {}", root.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Available projects:".cyan().bold());
    for name in names {
        match store.open(&name) {
            Ok(project) => println!("  {}: {}", name.bold(), project.description),
            Err(e) => println!("  {}: {} {:#}", name.bold(), "unreadable:".yellow(), e),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `project show`
pub fn show(root: &Path, name: &str) -> Result<ExitCode> {
    let project = ProjectStore::new(root).open(name)?;
    println!("{} {}", "Project:".cyan().bold(), project.name);
    println!("{} {}", "Description:".dimmed(), project.description);
    println!("{} {}", "Author:".dimmed(), project.author);
    println!("{} {}", "Created:".dimmed(), project.created);
    println!("{} {}", "Modified:".dimmed(), project.modified);
    println!(
        "{} {} BPM, {}x{} grid, {} Hz",
        "Settings:".dimmed(),
        project.settings.default_tempo,
        project.settings.grid_width,
        project.settings.grid_height,
        project.settings.sample_rate
    );
    println!("{} {}", "Sequences:".dimmed(), project.sequences.len());
    Ok(ExitCode::SUCCESS)
}

/// Run `project sequences`
pub fn sequences(root: &Path, name: &str) -> Result<ExitCode> {
    let project = ProjectStore::new(root).open(name)?;
    if project.sequences.is_empty() {
        println!("No sequences in project '{}'", name);
        return Ok(ExitCode::SUCCESS);
    }
    println!("{} '{}':", "Sequences in project".cyan().bold(), name);
    for sequence in &project.sequences {
        println!("  {}", sequence);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `project save`
pub fn save(root: &Path, name: &str, sequence_path: &str) -> Result<ExitCode> {
    let sequence = load_sequence(Path::new(sequence_path))?.document.sequence;
    let path = ProjectStore::new(root).save_sequence(name, &sequence)?;
    println!(
        "{} Sequence '{}' saved to {}",
        "SUCCESS".green().bold(),
        sequence.name,
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run `project remove`
pub fn remove(root: &Path, name: &str, sequence: &str) -> Result<ExitCode> {
    ProjectStore::new(root).remove_sequence(name, sequence)?;
    println!(
        "{} Sequence '{}' removed from project '{}'",
        "SUCCESS".green().bold(),
        sequence,
        name
    );
    Ok(ExitCode::SUCCESS)
}

/// Run `project delete`
pub fn delete(root: &Path, name: &str) -> Result<ExitCode> {
    let dir = ProjectStore::new(root).delete(name)?;
    println!(
        "{} Project '{}' deleted ({})",
        "SUCCESS".green().bold(),
        name,
        dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

/// Run `project backup`
pub fn backup(root: &Path, name: &str) -> Result<ExitCode> {
    let path = ProjectStore::new(root).backup(name)?;
    println!(
        "{} Project '{}' backed up to {}",
        "SUCCESS".green().bold(),
        name,
        path.display()
    );
    Ok(ExitCode::SUCCESS)
}
