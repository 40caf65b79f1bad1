//! Shared sequences and effect chains for the end-to-end tests.

use seq80_spec::{
    DistortionCurve, EffectSpec, FilterMode, Note, PatternLibrary, Pitch, RenderConfig, Sequence,
};

/// Parses a pitch name, panicking on typos in fixtures.
pub fn pitch(name: &str) -> Pitch {
    Pitch::parse(name).unwrap_or_else(|e| panic!("bad fixture pitch {name}: {e}"))
}

/// The reference arpeggio: 8 steps at 120 BPM, C4 E4 G4 C5 on even steps.
pub fn arpeggio() -> Sequence {
    ["C4", "E4", "G4", "C5"]
        .iter()
        .enumerate()
        .fold(Sequence::new("arpeggio", 120, 8), |seq, (i, name)| {
            seq.with_note(Note::new(pitch(name), i as u32 * 2))
        })
}

/// Every built-in pattern converted to a sequence, keyed by pattern id.
pub fn builtin_sequences() -> Vec<(String, Sequence)> {
    let library = PatternLibrary::new();
    library
        .list(None)
        .into_iter()
        .filter_map(|id| library.get(id).map(|p| (id.to_string(), p.to_sequence())))
        .collect()
}

/// One of every effect kind, with moderate settings.
pub fn full_chain() -> Vec<EffectSpec> {
    vec![
        EffectSpec::Filter {
            mode: FilterMode::Lowpass,
            cutoff_hz: 4000.0,
            resonance: 0.707,
        },
        EffectSpec::Distortion {
            drive: 2.0,
            curve: DistortionCurve::Tanh,
            output_gain: 0.8,
        },
        EffectSpec::Chorus {
            rate_hz: 1.5,
            depth_ms: 3.0,
            mix: 0.4,
        },
        EffectSpec::Flanger {
            rate_hz: 0.5,
            depth_ms: 2.0,
            feedback: 0.5,
            mix: 0.5,
        },
        EffectSpec::Tremolo {
            rate_hz: 5.0,
            depth: 0.3,
        },
        EffectSpec::Compressor {
            threshold_db: -12.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            makeup_db: 0.0,
        },
        EffectSpec::Delay {
            time_ms: 125.0,
            feedback: 0.4,
            mix: 0.3,
            tail: true,
        },
        EffectSpec::Reverb {
            room_size: 0.6,
            damping: 0.5,
            decay: 0.5,
            mix: 0.25,
            tail: true,
        },
    ]
}

/// Stereo render config carrying [`full_chain`].
pub fn full_chain_config() -> RenderConfig {
    full_chain()
        .into_iter()
        .fold(RenderConfig::default().with_channels(2), |config, effect| {
            config.with_effect(effect)
        })
}
