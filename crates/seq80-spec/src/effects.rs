//! Serializable effect chain definitions.
//!
//! A chain is an ordered list of [`EffectSpec`] values. The audio backend
//! turns each entry into a stateful processor; ranges are checked there, at
//! construction time.

use serde::{Deserialize, Serialize};

/// One entry of an effect chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectSpec {
    /// Feedback delay.
    Delay {
        /// Delay time in milliseconds (1-2000).
        time_ms: f64,
        /// Feedback amount, 0.0 up to but excluding 0.95.
        feedback: f64,
        /// Wet/dry mix (0.0-1.0).
        mix: f64,
        /// Append a decay tail past the end of the input.
        #[serde(default)]
        tail: bool,
    },
    /// Freeverb-style reverb.
    Reverb {
        /// Room size (0.0-1.0).
        room_size: f64,
        /// High frequency damping (0.0-1.0).
        #[serde(default = "default_damping")]
        damping: f64,
        /// Decay amount, 0.0 up to but excluding 1.0.
        decay: f64,
        /// Wet/dry mix (0.0-1.0).
        mix: f64,
        /// Append a decay tail past the end of the input.
        #[serde(default)]
        tail: bool,
    },
    /// LFO-modulated delay.
    Chorus {
        /// LFO rate in Hz (0-20).
        rate_hz: f64,
        /// Modulation depth in milliseconds (0-20).
        depth_ms: f64,
        /// Wet/dry mix (0.0-1.0).
        mix: f64,
    },
    /// Short modulated delay with feedback.
    Flanger {
        /// LFO rate in Hz (0-10).
        rate_hz: f64,
        /// Modulation depth in milliseconds (0-10).
        depth_ms: f64,
        /// Feedback amount, strictly between -0.95 and 0.95.
        feedback: f64,
        /// Wet/dry mix (0.0-1.0).
        mix: f64,
    },
    /// Waveshaping distortion.
    Distortion {
        /// Drive amount (0-100). Zero bypasses the shaper.
        drive: f64,
        /// Shaping curve.
        #[serde(default)]
        curve: DistortionCurve,
        /// Output gain (0.0-4.0).
        #[serde(default = "default_output_gain")]
        output_gain: f64,
    },
    /// Biquad filter.
    Filter {
        /// Response type.
        mode: FilterMode,
        /// Cutoff frequency in Hz. Values above Nyquist are clamped.
        cutoff_hz: f64,
        /// Resonance as Q (0.1-20).
        #[serde(default = "default_resonance")]
        resonance: f64,
    },
    /// Dynamics compressor.
    Compressor {
        /// Threshold in dB (-60 to 0).
        threshold_db: f64,
        /// Compression ratio (1.0-20.0).
        ratio: f64,
        /// Attack time in ms (0.1-100).
        attack_ms: f64,
        /// Release time in ms (1-1000).
        release_ms: f64,
        /// Makeup gain in dB (0-24).
        #[serde(default)]
        makeup_db: f64,
    },
    /// LFO amplitude modulation.
    Tremolo {
        /// LFO rate in Hz (0-20).
        rate_hz: f64,
        /// Modulation depth (0.0-1.0).
        depth: f64,
    },
}

impl EffectSpec {
    /// Returns the serialized type tag (e.g., "delay").
    pub fn name(&self) -> &'static str {
        match self {
            EffectSpec::Delay { .. } => "delay",
            EffectSpec::Reverb { .. } => "reverb",
            EffectSpec::Chorus { .. } => "chorus",
            EffectSpec::Flanger { .. } => "flanger",
            EffectSpec::Distortion { .. } => "distortion",
            EffectSpec::Filter { .. } => "filter",
            EffectSpec::Compressor { .. } => "compressor",
            EffectSpec::Tremolo { .. } => "tremolo",
        }
    }
}

/// A named, reusable effect chain.
///
/// ```json
/// {"name": "lofi", "effects": [{"type": "distortion", "drive": 6.0}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectPreset {
    /// Preset name.
    pub name: String,
    /// Effects in processing order.
    pub effects: Vec<EffectSpec>,
}

impl EffectPreset {
    /// Creates a preset from a name and a chain.
    pub fn new(name: impl Into<String>, effects: Vec<EffectSpec>) -> Self {
        Self {
            name: name.into(),
            effects,
        }
    }
}

/// Distortion transfer curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistortionCurve {
    /// Cubic soft clipper.
    #[default]
    Soft,
    /// Hard clip at +/-1.
    Hard,
    /// Hyperbolic tangent saturation.
    Tanh,
}

/// Biquad filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Low-pass.
    Lowpass,
    /// High-pass.
    Highpass,
    /// Band-pass (constant skirt gain).
    Bandpass,
}

fn default_damping() -> f64 {
    0.5
}
fn default_output_gain() -> f64 {
    1.0
}
fn default_resonance() -> f64 {
    std::f64::consts::FRAC_1_SQRT_2
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delay_serde_roundtrip() {
        let effect = EffectSpec::Delay {
            time_ms: 250.0,
            feedback: 0.4,
            mix: 0.3,
            tail: true,
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"type\":\"delay\""));
        let parsed: EffectSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }

    #[test]
    fn test_preset_requires_name() {
        let preset: EffectPreset = serde_json::from_str(
            r#"{"name": "space", "effects": [{"type": "tremolo", "rate_hz": 4.0, "depth": 0.5}]}"#,
        )
        .unwrap();
        assert_eq!(
            preset,
            EffectPreset::new(
                "space",
                vec![EffectSpec::Tremolo {
                    rate_hz: 4.0,
                    depth: 0.5
                }]
            )
        );
        assert!(serde_json::from_str::<EffectPreset>(r#"{"effects": []}"#).is_err());
    }

    #[test]
    fn test_defaults_from_json() {
        let json = r#"[
            {"type": "reverb", "room_size": 0.7, "decay": 0.5, "mix": 0.3},
            {"type": "distortion", "drive": 4.0},
            {"type": "filter", "mode": "lowpass", "cutoff_hz": 2000.0}
        ]"#;
        let chain: Vec<EffectSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(
            chain[0],
            EffectSpec::Reverb {
                room_size: 0.7,
                damping: 0.5,
                decay: 0.5,
                mix: 0.3,
                tail: false,
            }
        );
        assert_eq!(
            chain[1],
            EffectSpec::Distortion {
                drive: 4.0,
                curve: DistortionCurve::Soft,
                output_gain: 1.0,
            }
        );
        match chain[2] {
            EffectSpec::Filter {
                mode, resonance, ..
            } => {
                assert_eq!(mode, FilterMode::Lowpass);
                assert!((resonance - 0.7071).abs() < 1e-4);
            }
            _ => panic!("Expected Filter variant"),
        }
    }

    #[test]
    fn test_unknown_effect_rejected() {
        assert!(serde_json::from_str::<EffectSpec>(r#"{"type": "phaser", "rate": 1.0}"#).is_err());
    }

    #[test]
    fn test_names_match_tags() {
        let effects = vec![
            EffectSpec::Chorus {
                rate_hz: 1.0,
                depth_ms: 3.0,
                mix: 0.5,
            },
            EffectSpec::Tremolo {
                rate_hz: 5.0,
                depth: 0.5,
            },
            EffectSpec::Compressor {
                threshold_db: -12.0,
                ratio: 4.0,
                attack_ms: 5.0,
                release_ms: 50.0,
                makeup_db: 0.0,
            },
        ];
        for effect in effects {
            let json = serde_json::to_value(&effect).unwrap();
            assert_eq!(json["type"], effect.name());
        }
    }
}
