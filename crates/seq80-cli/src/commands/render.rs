//! Render command implementation
//!
//! Renders a sequence document to a WAV file, applying the document's
//! effect chain.

use anyhow::{Context, Result};
use colored::Colorize;
use seq80_backend_audio::{render_with_effects, WavResult};
use seq80_spec::{RenderConfig, Waveform};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use crate::input::{load_sequence, LoadResult};
use crate::output::write_atomic;

/// Render settings given on the command line. Unset fields keep the
/// document's values.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    /// Output sample rate.
    pub sample_rate: Option<u32>,
    /// Oscillator waveform name.
    pub waveform: Option<String>,
    /// Force stereo output.
    pub stereo: bool,
    /// Noise seed.
    pub seed: Option<u32>,
}

impl RenderOverrides {
    /// Applies the overrides on top of `config`.
    pub fn apply(&self, mut config: RenderConfig) -> Result<RenderConfig> {
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(name) = &self.waveform {
            config.waveform = name.parse::<Waveform>()?;
        }
        if self.stereo {
            config.channels = 2;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

/// Run the render command
///
/// # Arguments
/// * `input` - Path to the sequence JSON file
/// * `output` - Path of the WAV file to write
/// * `overrides` - Command-line render settings
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(input: &str, output: &str, overrides: &RenderOverrides) -> Result<ExitCode> {
    let start = Instant::now();
    println!("{} {}", "Rendering:".cyan().bold(), input);

    let LoadResult {
        document,
        source_hash,
    } = load_sequence(Path::new(input))?;
    let config = overrides.apply(document.render.unwrap_or_default())?;
    let sequence = &document.sequence;

    let buffer = render_with_effects(sequence, &config)
        .with_context(|| format!("Failed to render sequence '{}'", sequence.name))?;
    let wav = WavResult::from_buffer(&buffer).context("Failed to encode WAV")?;
    write_atomic(Path::new(output), &wav.wav_data)?;

    println!(
        "{} {} ({} BPM, {} steps, {} notes)",
        "Sequence:".dimmed(),
        sequence.name,
        sequence.tempo,
        sequence.steps,
        sequence.notes.len()
    );
    println!(
        "{} {} Hz, {} ch, {}, {} effects",
        "Format:".dimmed(),
        wav.sample_rate,
        wav.channels,
        config.waveform.as_str(),
        config.effects.len()
    );
    println!(
        "{} {} frames ({:.3}s)",
        "Length:".dimmed(),
        wav.num_frames,
        wav.duration_seconds()
    );
    println!("{} {}", "Source hash:".dimmed(), &source_hash[..16]);
    println!("{} {}", "PCM hash:".dimmed(), &wav.pcm_hash[..16]);
    println!(
        "{} Wrote {} in {}ms",
        "SUCCESS".green().bold(),
        output,
        start.elapsed().as_millis()
    );
    Ok(ExitCode::SUCCESS)
}
