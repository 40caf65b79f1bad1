//! seq80 CLI - Command-line interface for the seq80 step sequencer
//!
//! Renders sequence files to audio, exports them to interchange formats,
//! processes WAV files through effect chains and manages projects.

mod cli_args;

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli_args::{Cli, Commands, PatternsAction, ProjectAction};
use seq80_cli::commands::effects::EffectFlags;
use seq80_cli::commands::render::RenderOverrides;
use seq80_cli::commands::{self, patterns, project};
use seq80_cli::reporting::format_error;

/// Builds the log filter: `SEQ80_LOG`, then `RUST_LOG`, then `warn`, or
/// `debug` with `--verbose`.
fn log_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "warn" };
    ["SEQ80_LOG", "RUST_LOG"]
        .iter()
        .find_map(|var| {
            std::env::var(var)
                .ok()
                .and_then(|value| EnvFilter::try_new(value).ok())
        })
        .unwrap_or_else(|| EnvFilter::new(default))
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(log_filter(verbose))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Patterns { dir, action } => {
            let dir = Path::new(&dir);
            match action {
                PatternsAction::List { category } => patterns::list(dir, category.as_deref()),
                PatternsAction::Show { name, save } => patterns::show(dir, &name, save.as_deref()),
                PatternsAction::Categories => patterns::categories(dir),
                PatternsAction::Create {
                    name,
                    notes,
                    tempo,
                    description,
                    category,
                } => patterns::create(dir, &name, &notes, tempo, &description, &category),
            }
        }
        Commands::Render {
            input,
            output,
            sample_rate,
            waveform,
            stereo,
            seed,
        } => commands::render::run(
            &input,
            &output,
            &RenderOverrides {
                sample_rate,
                waveform,
                stereo,
                seed,
            },
        ),
        Commands::Export {
            input,
            format,
            output,
            sample_rate,
            waveform,
            stereo,
        } => commands::export::run(
            &input,
            &format,
            output.as_deref(),
            &RenderOverrides {
                sample_rate,
                waveform,
                stereo,
                seed: None,
            },
        ),
        Commands::Effects {
            input,
            output,
            reverb,
            delay,
            distortion,
            chain,
            preset,
            save_preset,
        } => commands::effects::run(
            &input,
            &output,
            &EffectFlags {
                reverb,
                delay,
                distortion,
                chain,
                preset,
                save_preset,
            },
        ),
        Commands::Project { root, action } => {
            let root = Path::new(&root);
            match action {
                ProjectAction::Create {
                    name,
                    description,
                    author,
                } => project::create(
                    root,
                    &name,
                    description.as_deref().unwrap_or(""),
                    author.as_deref().unwrap_or(""),
                ),
                ProjectAction::List => project::list(root),
                ProjectAction::Show { name } => project::show(root, &name),
                ProjectAction::Sequences { name } => project::sequences(root, &name),
                ProjectAction::Save { name, sequence } => project::save(root, &name, &sequence),
                ProjectAction::Remove { name, sequence } => {
                    project::remove(root, &name, &sequence)
                }
                ProjectAction::Delete { name } => project::delete(root, &name),
                ProjectAction::Backup { name } => project::backup(root, &name),
            }
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            ExitCode::from(1)
        }
    }
}
