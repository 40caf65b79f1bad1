//! Lossless JSON sequence documents.

use serde::{Deserialize, Serialize};
use seq80_spec::{RenderConfig, Sequence};

use crate::artifact::FORMAT_VERSION;
use crate::error::{ExportError, ExportResult};

/// Top-level JSON document.
///
/// ```json
/// {
///   "format_version": 1,
///   "sequence": { "name": "arp", "tempo": 120, "steps": 8, ... },
///   "render": { "sample_rate": 44100, ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDocument {
    /// Document layout version.
    pub format_version: u32,
    /// The sequence, every field included.
    pub sequence: Sequence,
    /// Optional render settings travelling with the sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderConfig>,
}

impl SequenceDocument {
    /// Wraps a sequence at the current format version.
    pub fn new(sequence: Sequence) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            sequence,
            render: None,
        }
    }

    /// Attaches render settings.
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = Some(render);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyDocument {
    Document(SequenceDocument),
    Bare(Sequence),
}

/// Serializes a sequence, and optionally its render settings, as pretty
/// JSON with a trailing newline.
///
/// The output holds no timestamps, so equal inputs give equal bytes.
pub fn export_json(sequence: &Sequence, render: Option<&RenderConfig>) -> ExportResult<Vec<u8>> {
    sequence.validate()?;
    let mut document = SequenceDocument::new(sequence.clone());
    document.render = render.cloned();
    let mut bytes = serde_json::to_vec_pretty(&document)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parses a document written by [`export_json`], or a bare sequence object.
///
/// The sequence, and the render settings if present, are validated.
pub fn import_json(bytes: &[u8]) -> ExportResult<SequenceDocument> {
    let document = match serde_json::from_slice::<AnyDocument>(bytes) {
        Ok(AnyDocument::Document(doc)) => doc,
        Ok(AnyDocument::Bare(sequence)) => SequenceDocument::new(sequence),
        // Reparse strictly so the error names the real problem
        Err(_) => serde_json::from_slice::<SequenceDocument>(bytes)?,
    };

    if document.format_version != FORMAT_VERSION {
        return Err(ExportError::unsupported(format!(
            "format_version {} (expected {})",
            document.format_version, FORMAT_VERSION
        )));
    }
    document.sequence.validate()?;
    if let Some(render) = &document.render {
        render.validate()?;
    }
    Ok(document)
}

/// Parses a document and returns only its sequence.
pub fn import_sequence(bytes: &[u8]) -> ExportResult<Sequence> {
    Ok(import_json(bytes)?.sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use seq80_spec::{EffectSpec, Note, NoteDuration, Pitch, SpecError, Waveform};

    fn sample() -> Sequence {
        Sequence::new("lead", 133, 16)
            .with_steps_per_beat(2)
            .with_note(
                Note::new(Pitch::parse("Bb3").unwrap(), 5)
                    .with_velocity(0.1 + 0.2)
                    .with_duration(NoteDuration::Seconds(1.0 / 3.0)),
            )
            .with_note(Note::new(Pitch::parse("C#5").unwrap(), 0))
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let render = RenderConfig::default()
            .with_waveform(Waveform::Sine)
            .with_effect(EffectSpec::Tremolo {
                rate_hz: 5.5,
                depth: 0.3,
            });
        let bytes = export_json(&sample(), Some(&render)).unwrap();
        let doc = import_json(&bytes).unwrap();

        assert_eq!(doc.sequence, sample());
        assert_eq!(doc.render, Some(render));
        assert_eq!(doc.format_version, FORMAT_VERSION);
    }

    #[test]
    fn test_output_is_deterministic_and_terminated() {
        let a = export_json(&sample(), None).unwrap();
        let b = export_json(&sample(), None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.last(), Some(&b'\n'));

        let text = String::from_utf8(a).unwrap();
        assert!(text.starts_with("{\n  \"format_version\": 1,"));
        assert!(!text.contains("\"render\""));
        assert!(text.contains("\"C#5\""));
    }

    #[test]
    fn test_bare_sequence_accepted() {
        let bytes = serde_json::to_vec(&sample()).unwrap();
        let doc = import_json(&bytes).unwrap();
        assert_eq!(doc.sequence, sample());
        assert_eq!(doc.render, None);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let json = br#"{"format_version": 2, "sequence": {"name": "x", "tempo": 120, "steps": 4, "notes": []}}"#;
        assert!(matches!(
            import_json(json),
            Err(ExportError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_import_validates() {
        let json = br#"{"name": "x", "tempo": 20, "steps": 4, "notes": []}"#;
        assert!(matches!(import_json(json), Err(ExportError::Spec(_))));
        assert!(matches!(import_json(b"[1, 2"), Err(ExportError::Json(_))));
    }

    #[test]
    fn test_import_rejects_oversized_grid() {
        let json = br#"{"name": "x", "tempo": 120, "steps": 4000000000, "notes": []}"#;
        match import_json(json) {
            Err(ExportError::Spec(SpecError::InvalidParameter { name, .. })) => {
                assert_eq!(name, "sequence.steps")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
