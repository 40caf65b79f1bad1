//! Render configuration threaded through every render and export call.

use serde::{Deserialize, Serialize};

use crate::effects::EffectSpec;
use crate::error::{SpecError, SpecResult};

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default global amplitude.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Naive square wave.
    Square,
    /// Band-limited odd-harmonic square series.
    #[default]
    SquareHarmonics,
    /// Pure sine.
    Sine,
    /// Seeded white noise.
    Noise,
}

impl Waveform {
    /// All waveform kinds, in declaration order.
    pub const ALL: [Waveform; 4] = [
        Waveform::Square,
        Waveform::SquareHarmonics,
        Waveform::Sine,
        Waveform::Noise,
    ];

    /// Returns the serialized name (e.g., "square_harmonics").
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Square => "square",
            Waveform::SquareHarmonics => "square_harmonics",
            Waveform::Sine => "sine",
            Waveform::Noise => "noise",
        }
    }
}

impl std::str::FromStr for Waveform {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| {
                SpecError::invalid_param("waveform", format!("unknown waveform '{}'", s))
            })
    }
}

/// Per-note attack/release ramp used to avoid clicks at note edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Linear fade-in length in milliseconds.
    pub attack_ms: f64,
    /// Linear fade-out length in milliseconds.
    pub release_ms: f64,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack_ms: 2.0,
            release_ms: 5.0,
        }
    }
}

impl EnvelopeConfig {
    /// An envelope that leaves notes untouched.
    pub const NONE: EnvelopeConfig = EnvelopeConfig {
        attack_ms: 0.0,
        release_ms: 0.0,
    };
}

/// Capacity limits checked before any buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderBudget {
    /// Maximum number of samples (frames times channels) in one buffer.
    pub max_samples: usize,
}

impl Default for RenderBudget {
    fn default() -> Self {
        Self {
            max_samples: Self::DEFAULT_MAX_SAMPLES,
        }
    }
}

impl RenderBudget {
    /// 30 minutes of stereo audio at 48kHz.
    pub const DEFAULT_MAX_SAMPLES: usize = 30 * 60 * 48_000 * 2;
}

/// Everything the renderer needs besides the sequence itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count (1 or 2).
    pub channels: u16,
    /// Oscillator waveform.
    pub waveform: Waveform,
    /// Global amplitude (0.0-1.0), multiplied with note velocity.
    pub amplitude: f64,
    /// Per-note declick envelope.
    pub envelope: EnvelopeConfig,
    /// Effect chain applied after rendering, in order.
    pub effects: Vec<EffectSpec>,
    /// Seed for noise oscillators.
    pub seed: u32,
    /// Capacity limits.
    pub budget: RenderBudget,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
            waveform: Waveform::default(),
            amplitude: DEFAULT_AMPLITUDE,
            envelope: EnvelopeConfig::default(),
            effects: Vec::new(),
            seed: 0,
            budget: RenderBudget::default(),
        }
    }
}

impl RenderConfig {
    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the waveform.
    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Sets the channel count.
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    /// Sets the envelope.
    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope;
        self
    }

    /// Appends an effect to the chain.
    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    /// Checks sample rate, channel count, amplitude and envelope.
    pub fn validate(&self) -> SpecResult<()> {
        if self.sample_rate == 0 {
            return Err(SpecError::invalid_param(
                "render.sample_rate",
                "must be positive",
            ));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(SpecError::invalid_param(
                "render.channels",
                format!("must be 1 or 2, got {}", self.channels),
            ));
        }
        if !self.amplitude.is_finite() || !(0.0..=1.0).contains(&self.amplitude) {
            return Err(SpecError::invalid_param(
                "render.amplitude",
                format!("must be 0.0-1.0, got {}", self.amplitude),
            ));
        }
        for (name, value) in [
            ("render.envelope.attack_ms", self.envelope.attack_ms),
            ("render.envelope.release_ms", self.envelope.release_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpecError::invalid_param(
                    name,
                    format!("must be non-negative, got {}", value),
                ));
            }
        }
        Ok(())
    }
}
