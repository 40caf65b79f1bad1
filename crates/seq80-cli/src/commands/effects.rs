//! Effects command implementation
//!
//! Runs a WAV file through an effect chain built from flags, a JSON chain
//! file and/or a named preset. The assembled chain can be saved as a preset.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use seq80_backend_audio::{apply_effects, read_pcm16, EffectChain, WavResult};
use seq80_spec::{DistortionCurve, EffectPreset, EffectSpec};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::output::write_atomic;

/// Effects requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct EffectFlags {
    /// Reverb room size.
    pub reverb: Option<f64>,
    /// Delay time in seconds.
    pub delay: Option<f64>,
    /// Distortion drive.
    pub distortion: Option<f64>,
    /// Path to a JSON chain definition.
    pub chain: Option<String>,
    /// Path to a preset file (`{"name": .., "effects": [..]}`).
    pub preset: Option<String>,
    /// Write the assembled chain as a preset to this path.
    pub save_preset: Option<String>,
}

/// A chain file: a bare array of effects, or an object with an `effects`
/// array (such as a `render` section).
#[derive(Deserialize)]
#[serde(untagged)]
enum ChainFile {
    List(Vec<EffectSpec>),
    Object { effects: Vec<EffectSpec> },
}

impl EffectFlags {
    /// Builds the chain definition: preset entries first, then chain file
    /// entries, then reverb, delay and distortion flags in that order.
    pub fn to_specs(&self) -> Result<Vec<EffectSpec>> {
        let mut specs = match &self.preset {
            Some(path) => load_preset(Path::new(path))?.effects,
            None => Vec::new(),
        };
        if let Some(path) = &self.chain {
            specs.extend(load_chain_file(Path::new(path))?);
        }
        if let Some(room_size) = self.reverb {
            specs.push(EffectSpec::Reverb {
                room_size,
                damping: 0.5,
                decay: 0.5,
                mix: 0.3,
                tail: true,
            });
        }
        if let Some(seconds) = self.delay {
            specs.push(EffectSpec::Delay {
                time_ms: seconds * 1000.0,
                feedback: 0.3,
                mix: 0.5,
                tail: true,
            });
        }
        if let Some(drive) = self.distortion {
            specs.push(EffectSpec::Distortion {
                drive,
                curve: DistortionCurve::Soft,
                output_gain: 1.0,
            });
        }
        Ok(specs)
    }
}

fn load_chain_file(path: &Path) -> Result<Vec<EffectSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chain file: {}", path.display()))?;
    let chain: ChainFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse chain file: {}", path.display()))?;
    Ok(match chain {
        ChainFile::List(effects) | ChainFile::Object { effects } => effects,
    })
}

/// Reads a preset file.
pub fn load_preset(path: &Path) -> Result<EffectPreset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preset: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse preset: {}", path.display()))
}

/// Writes `effects` as a preset named after the file stem of `path`.
pub fn save_preset(path: &Path, effects: &[EffectSpec]) -> Result<EffectPreset> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Invalid preset path: {}", path.display()))?;
    let preset = EffectPreset::new(name, effects.to_vec());
    let mut json = serde_json::to_vec_pretty(&preset).context("Failed to serialize preset")?;
    json.push(b'\n');
    write_atomic(path, &json)?;
    Ok(preset)
}

/// Run the effects command
///
/// # Arguments
/// * `input` - Path to a PCM16 WAV file
/// * `output` - Path of the WAV file to write
/// * `flags` - Requested effects
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(input: &str, output: &str, flags: &EffectFlags) -> Result<ExitCode> {
    let specs = flags.to_specs()?;
    if specs.is_empty() {
        bail!("No effects specified (use --reverb, --delay, --distortion, --chain or --preset)");
    }

    println!("{} {}", "Processing:".cyan().bold(), input);
    let bytes = fs::read(input).with_context(|| format!("Failed to read WAV file: {}", input))?;
    let buffer = read_pcm16(&bytes).with_context(|| format!("Failed to decode WAV file: {}", input))?;

    let mut chain = EffectChain::from_specs(&specs, buffer.sample_rate())
        .context("Invalid effect chain")?;
    println!("{} {}", "Chain:".dimmed(), chain.names().join(" -> "));
    if let Some(path) = &flags.save_preset {
        let preset = save_preset(Path::new(path), &specs)?;
        println!("{} '{}' saved to {}", "Preset:".dimmed(), preset.name, path);
    }

    let in_frames = buffer.frames();
    let processed = apply_effects(buffer, &mut chain);
    let wav = WavResult::from_buffer(&processed).context("Failed to encode WAV")?;
    write_atomic(Path::new(output), &wav.wav_data)?;

    println!(
        "{} {} -> {} frames",
        "Length:".dimmed(),
        in_frames,
        wav.num_frames
    );
    println!(
        "{} Effects applied and saved to {}",
        "SUCCESS".green().bold(),
        output
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_in_fixed_order() {
        let flags = EffectFlags {
            reverb: Some(0.6),
            delay: Some(0.25),
            distortion: Some(4.0),
            ..Default::default()
        };
        let names: Vec<&str> = flags.to_specs().unwrap().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["reverb", "delay", "distortion"]);
    }

    #[test]
    fn test_chain_file_forms() {
        let tmp = tempfile::tempdir().unwrap();
        let list = tmp.path().join("list.json");
        fs::write(&list, r#"[{"type": "tremolo", "rate_hz": 5.0, "depth": 0.5}]"#).unwrap();
        let object = tmp.path().join("object.json");
        fs::write(
            &object,
            r#"{"sample_rate": 44100, "effects": [{"type": "filter", "mode": "lowpass", "cutoff_hz": 800.0}]}"#,
        )
        .unwrap();

        let flags = EffectFlags {
            delay: Some(0.1),
            chain: Some(list.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let specs = flags.to_specs().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name(), "tremolo");

        let specs = load_chain_file(&object).unwrap();
        assert_eq!(specs[0].name(), "filter");
    }

    #[test]
    fn test_preset_runs_before_chain_and_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let chain = tmp.path().join("chain.json");
        fs::write(&chain, r#"[{"type": "tremolo", "rate_hz": 5.0, "depth": 0.5}]"#).unwrap();

        let preset_path = tmp.path().join("lofi.json");
        let preset = save_preset(
            &preset_path,
            &[EffectSpec::Filter {
                mode: seq80_spec::FilterMode::Lowpass,
                cutoff_hz: 1200.0,
                resonance: 1.0,
            }],
        )
        .unwrap();
        assert_eq!(preset.name, "lofi");
        assert_eq!(load_preset(&preset_path).unwrap(), preset);

        let flags = EffectFlags {
            reverb: Some(0.4),
            chain: Some(chain.to_string_lossy().into_owned()),
            preset: Some(preset_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        let names: Vec<&str> = flags.to_specs().unwrap().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["filter", "tremolo", "reverb"]);
    }

    #[test]
    fn test_missing_preset_is_an_error() {
        let flags = EffectFlags {
            preset: Some("/nonexistent/seq80/preset.json".to_string()),
            ..Default::default()
        };
        assert!(flags.to_specs().is_err());
    }

    #[test]
    fn test_no_effects_is_an_error() {
        assert!(run("in.wav", "out.wav", &EffectFlags::default()).is_err());
    }
}
