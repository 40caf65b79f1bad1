//! Export command implementation
//!
//! Exports a sequence document to WAV, MIDI, JSON, CSV or TXT.

use anyhow::{Context, Result};
use colored::Colorize;
use seq80_backend_export::{export, ExportFormat, ExportOptions, ExportSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::render::RenderOverrides;
use crate::input::load_sequence;
use crate::output::write_atomic;

/// Output path used when none is given: the input path with the format's
/// extension.
pub fn default_output_path(input: &Path, format: ExportFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Run the export command
///
/// # Arguments
/// * `input` - Path to the sequence JSON file
/// * `format` - Target format name (wav, midi, json, csv, txt)
/// * `output` - Output path (default: input stem + format extension)
/// * `overrides` - Render settings for WAV exports
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(
    input: &str,
    format: &str,
    output: Option<&str>,
    overrides: &RenderOverrides,
) -> Result<ExitCode> {
    let format: ExportFormat = format.parse()?;
    let input_path = Path::new(input);
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input_path, format));
    if output_path == input_path {
        anyhow::bail!(
            "Refusing to overwrite the input file: {} (use --output)",
            input_path.display()
        );
    }

    println!(
        "{} {} as {}",
        "Exporting:".cyan().bold(),
        input,
        format.as_str().to_uppercase()
    );

    let document = load_sequence(input_path)?.document;
    let has_render = document.render.is_some();
    let options = ExportOptions {
        render: overrides.apply(document.render.unwrap_or_default())?,
        include_render: has_render,
    };

    let artifact = export(ExportSource::Sequence(&document.sequence), format, &options)
        .with_context(|| format!("Failed to export '{}' as {}", input, format))?;
    write_atomic(&output_path, &artifact.bytes)?;

    println!(
        "{} {} bytes, hash {}",
        "Artifact:".dimmed(),
        artifact.len(),
        &artifact.metadata.content_hash[..16]
    );
    println!(
        "{} Sequence exported to {}",
        "SUCCESS".green().bold(),
        output_path.display()
    );
    Ok(ExitCode::SUCCESS)
}
