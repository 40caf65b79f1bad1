//! Resonant biquad filter effect.
//!
//! Coefficients follow the Audio EQ Cookbook formulas; the filter runs in
//! direct form I with one state per channel.

use std::f64::consts::PI;

use seq80_spec::FilterMode;
use tracing::warn;

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};

use super::{check_range, check_sample_rate};

/// Highest usable cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f64 = 0.49;

/// Biquad filter coefficients, normalized by `a0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Creates lowpass filter coefficients.
    pub fn lowpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_omega, alpha) = omega_terms(cutoff, q, sample_rate);
        Self::normalize(
            (1.0 - cos_omega) / 2.0,
            1.0 - cos_omega,
            (1.0 - cos_omega) / 2.0,
            cos_omega,
            alpha,
        )
    }

    /// Creates highpass filter coefficients.
    pub fn highpass(cutoff: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_omega, alpha) = omega_terms(cutoff, q, sample_rate);
        Self::normalize(
            (1.0 + cos_omega) / 2.0,
            -(1.0 + cos_omega),
            (1.0 + cos_omega) / 2.0,
            cos_omega,
            alpha,
        )
    }

    /// Creates bandpass filter coefficients (constant 0 dB peak gain).
    pub fn bandpass(center: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_omega, alpha) = omega_terms(center, q, sample_rate);
        Self::normalize(alpha, 0.0, -alpha, cos_omega, alpha)
    }

    /// Coefficients for `mode`.
    pub fn for_mode(mode: FilterMode, cutoff: f64, q: f64, sample_rate: f64) -> Self {
        match mode {
            FilterMode::Lowpass => Self::lowpass(cutoff, q, sample_rate),
            FilterMode::Highpass => Self::highpass(cutoff, q, sample_rate),
            FilterMode::Bandpass => Self::bandpass(cutoff, q, sample_rate),
        }
    }

    fn normalize(b0: f64, b1: f64, b2: f64, cos_omega: f64, alpha: f64) -> Self {
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

fn omega_terms(frequency: f64, q: f64, sample_rate: f64) -> (f64, f64) {
    let omega = 2.0 * PI * frequency / sample_rate;
    (omega.cos(), omega.sin() / (2.0 * q))
}

/// Biquad filter state.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl BiquadFilter {
    /// Creates a filter with cleared state.
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Clears the filter state.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}

/// Lowpass, highpass or bandpass filter effect.
#[derive(Debug, Clone)]
pub struct Filter {
    mode: FilterMode,
    cutoff_hz: f64,
    channels: [BiquadFilter; 2],
}

impl Filter {
    /// Creates a filter.
    ///
    /// Cutoffs at or above `0.49 * sample_rate` are clamped to that value and
    /// logged; non-positive cutoffs are rejected.
    ///
    /// # Arguments
    /// * `mode` - Filter response
    /// * `cutoff_hz` - Cutoff (or center) frequency in Hz
    /// * `resonance` - Q factor (0.1-20.0); 0.707 is Butterworth
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        mode: FilterMode,
        cutoff_hz: f64,
        resonance: f64,
        sample_rate: u32,
    ) -> AudioResult<Self> {
        check_sample_rate(sample_rate)?;
        if !cutoff_hz.is_finite() || cutoff_hz <= 0.0 {
            return Err(AudioError::invalid_param(
                "filter.cutoff_hz",
                format!("must be positive, got {}", cutoff_hz),
            ));
        }
        check_range("filter.resonance", resonance, 0.1, 20.0)?;

        let sr = sample_rate as f64;
        let max_cutoff = MAX_CUTOFF_RATIO * sr;
        let cutoff_hz = if cutoff_hz > max_cutoff {
            warn!(
                requested = cutoff_hz,
                clamped = max_cutoff,
                sample_rate,
                "filter cutoff above Nyquist, clamping"
            );
            max_cutoff
        } else {
            cutoff_hz
        };

        let filter = BiquadFilter::new(BiquadCoeffs::for_mode(mode, cutoff_hz, resonance, sr));
        Ok(Self {
            mode,
            cutoff_hz,
            channels: [filter.clone(), filter],
        })
    }

    /// Filter response.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Effective cutoff after clamping.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Processes a buffer.
    pub fn process(&mut self, mut buffer: SampleBuffer) -> SampleBuffer {
        let channels = buffer.channels() as usize;
        for frame in buffer.samples_mut().chunks_exact_mut(channels) {
            for (sample, filter) in frame.iter_mut().zip(self.channels.iter_mut()) {
                *sample = filter.process(*sample);
            }
        }
        buffer
    }

    /// Clears the filter state.
    pub fn reset(&mut self) {
        for filter in &mut self.channels {
            filter.reset();
        }
    }
}
