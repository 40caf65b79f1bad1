//! Export dispatch.

use seq80_backend_audio::{encode_wav, render_with_effects, SampleBuffer};
use seq80_spec::{RenderConfig, Sequence};
use tracing::debug;

use crate::artifact::{ExportArtifact, ExportFormat};
use crate::csv::export_csv;
use crate::error::{ExportError, ExportResult};
use crate::json::export_json;
use crate::midi::write_midi;
use crate::text::export_text;

/// What is being exported.
#[derive(Debug, Clone, Copy)]
pub enum ExportSource<'a> {
    /// A note sequence. Every format is available; WAV renders it first.
    Sequence(&'a Sequence),
    /// Already rendered audio. Only WAV is available.
    Buffer(&'a SampleBuffer),
}

impl ExportSource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            ExportSource::Sequence(_) => "sequence",
            ExportSource::Buffer(_) => "audio buffer",
        }
    }
}

/// Settings for [`export`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    /// Used to render sequences exported as WAV.
    pub render: RenderConfig,
    /// Embed `render` in JSON exports.
    pub include_render: bool,
}

impl ExportOptions {
    /// Options with the given render settings.
    pub fn with_render(render: RenderConfig) -> Self {
        Self {
            render,
            include_render: false,
        }
    }

    /// Embeds the render settings in JSON exports.
    pub fn including_render(mut self) -> Self {
        self.include_render = true;
        self
    }
}

/// Exports `source` as `format`, entirely in memory.
///
/// # Errors
/// * [`ExportError::Unsupported`] when a buffer is exported as anything but WAV
/// * Validation, capacity and format errors from the individual exporters
pub fn export(
    source: ExportSource<'_>,
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<ExportArtifact> {
    let artifact = match (source, format) {
        (ExportSource::Buffer(buffer), ExportFormat::Wav) => {
            ExportArtifact::new(format, encode_wav(buffer)?).with_audio(buffer)
        }
        (ExportSource::Buffer(_), _) => {
            return Err(ExportError::unsupported(format!(
                "an {} can only be exported as wav, not {}",
                source.kind(),
                format
            )));
        }
        (ExportSource::Sequence(sequence), _) => {
            let artifact = ExportArtifact::new(format, encode_sequence(sequence, format, options)?)
                .with_sequence(sequence);
            if format == ExportFormat::Wav {
                artifact.with_audio_format(options.render.sample_rate, options.render.channels)
            } else {
                artifact
            }
        }
    };

    debug!(
        source = source.kind(),
        format = format.as_str(),
        bytes = artifact.len(),
        hash = %artifact.metadata.content_hash,
        "exported artifact"
    );
    Ok(artifact)
}

fn encode_sequence(
    sequence: &Sequence,
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Midi => write_midi(sequence),
        ExportFormat::Json => {
            let render = options.include_render.then_some(&options.render);
            export_json(sequence, render)
        }
        ExportFormat::Csv => export_csv(sequence),
        ExportFormat::Txt => export_text(sequence),
        ExportFormat::Wav => {
            let buffer = render_with_effects(sequence, &options.render)?;
            Ok(encode_wav(&buffer)?)
        }
    }
}

/// Exports a sequence with default options.
pub fn export_sequence_as(sequence: &Sequence, format: ExportFormat) -> ExportResult<ExportArtifact> {
    export(ExportSource::Sequence(sequence), format, &ExportOptions::default())
}
