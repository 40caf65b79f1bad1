//! CLI argument definitions for the seq80 command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};
use seq80_cli::commands::patterns::DEFAULT_PATTERNS_DIR;
use seq80_cli::project_store::DEFAULT_PROJECTS_DIR;

const WAVEFORMS: [&str; 4] = ["square", "square_harmonics", "sine", "noise"];

/// seq80 - Step sequencer rendering and export
#[derive(Parser)]
#[command(name = "seq80")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging (overridden by SEQ80_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Browse and create melody patterns
    Patterns {
        /// Directory holding custom_patterns.json
        #[arg(long, global = true, default_value = DEFAULT_PATTERNS_DIR)]
        dir: String,

        #[command(subcommand)]
        action: PatternsAction,
    },

    /// Render a sequence file to WAV
    Render {
        /// Path to the sequence JSON file
        input: String,

        /// Path of the WAV file to write
        output: String,

        /// Output sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Oscillator waveform
        #[arg(long, value_parser = WAVEFORMS)]
        waveform: Option<String>,

        /// Write two identical channels
        #[arg(long)]
        stereo: bool,

        /// Seed for the noise waveform
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Export a sequence file to another format
    Export {
        /// Path to the sequence JSON file
        input: String,

        /// Output format
        #[arg(value_parser = ["wav", "midi", "mid", "json", "csv", "txt"])]
        format: String,

        /// Output file path (default: input path with the format's extension)
        #[arg(short, long)]
        output: Option<String>,

        /// Output sample rate in Hz (WAV only)
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Oscillator waveform (WAV only)
        #[arg(long, value_parser = WAVEFORMS)]
        waveform: Option<String>,

        /// Write two identical channels (WAV only)
        #[arg(long)]
        stereo: bool,
    },

    /// Apply audio effects to a WAV file
    Effects {
        /// Input WAV file (PCM16)
        input: String,

        /// Output WAV file
        output: String,

        /// Reverb room size (0.0-1.0)
        #[arg(long)]
        reverb: Option<f64>,

        /// Delay time in seconds
        #[arg(long)]
        delay: Option<f64>,

        /// Soft-clip distortion drive (0-100)
        #[arg(long)]
        distortion: Option<f64>,

        /// JSON file with an effect chain, applied before the flag effects
        #[arg(long)]
        chain: Option<String>,

        /// Preset file ({"name", "effects"}), applied before everything else
        #[arg(long)]
        preset: Option<String>,

        /// Save the assembled chain as a preset file
        #[arg(long)]
        save_preset: Option<String>,
    },

    /// Manage projects
    Project {
        /// Directory holding all projects
        #[arg(long, global = true, default_value = DEFAULT_PROJECTS_DIR)]
        root: String,

        #[command(subcommand)]
        action: ProjectAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum PatternsAction {
    /// List patterns
    List {
        /// Only list patterns in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one pattern
    Show {
        /// Pattern id
        name: String,

        /// Also write the pattern as a sequence JSON file
        #[arg(long)]
        save: Option<String>,
    },

    /// List pattern categories
    Categories,

    /// Create a custom pattern
    Create {
        /// Pattern id
        name: String,

        /// Pitches, one per step (e.g. C4 E4 G4)
        #[arg(long, num_args = 1.., required = true)]
        notes: Vec<String>,

        /// Tempo in BPM
        #[arg(long, default_value_t = 120)]
        tempo: u16,

        /// Description
        #[arg(long, default_value = "")]
        description: String,

        /// Category
        #[arg(long, default_value = "custom")]
        category: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ProjectAction {
    /// Create a project
    Create {
        /// Project name
        name: String,

        /// Description
        description: Option<String>,

        /// Author
        author: Option<String>,
    },

    /// List projects
    List,

    /// Show project metadata
    Show {
        /// Project name
        name: String,
    },

    /// List the sequences saved in a project
    Sequences {
        /// Project name
        name: String,
    },

    /// Save a sequence file into a project
    Save {
        /// Project name
        name: String,

        /// Path to the sequence JSON file
        sequence: String,
    },

    /// Remove a saved sequence from a project
    Remove {
        /// Project name
        name: String,

        /// Sequence name
        sequence: String,
    },

    /// Delete a project and everything in it
    Delete {
        /// Project name
        name: String,
    },

    /// Copy a project into the backups directory
    Backup {
        /// Project name
        name: String,
    },
}
