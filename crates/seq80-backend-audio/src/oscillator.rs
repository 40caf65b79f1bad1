//! Waveform oscillator.
//!
//! Every periodic waveform is a pure function of phase, and phase is derived
//! from the sample index (`i * f / sr`), so long notes never accumulate drift.

use std::f64::consts::PI;

use rand::Rng;
use seq80_spec::{RenderBudget, Waveform};

use crate::buffer::SampleBuffer;
use crate::error::{AudioError, AudioResult};
use crate::rng::create_rng;

const TWO_PI: f64 = 2.0 * PI;

/// Highest odd harmonic summed by [`Waveform::SquareHarmonics`] (8 partials).
pub const MAX_SQUARE_HARMONIC: u32 = 15;

/// Number of samples covering `duration_s` at `sample_rate`.
pub fn sample_count(duration_s: f64, sample_rate: u32) -> usize {
    (duration_s * sample_rate as f64).round() as usize
}

/// Synthesizes a mono tone.
///
/// A frequency of 0 is a rest and yields zeros of the right length. Noise
/// uses seed 0; see [`synthesize_seeded`] to pick another stream.
///
/// # Arguments
/// * `frequency_hz` - Frequency in Hz (>= 0)
/// * `duration_s` - Duration in seconds (> 0)
/// * `sample_rate` - Sample rate in Hz
/// * `waveform` - Waveform kind
/// * `amplitude` - Linear gain (0.0-1.0)
///
/// # Returns
/// A mono buffer of `round(duration_s * sample_rate)` samples in [-1, 1]
pub fn synthesize(
    frequency_hz: f64,
    duration_s: f64,
    sample_rate: u32,
    waveform: Waveform,
    amplitude: f64,
) -> AudioResult<SampleBuffer> {
    synthesize_seeded(frequency_hz, duration_s, sample_rate, waveform, amplitude, 0)
}

/// Synthesizes a mono tone with an explicit noise seed.
///
/// Tones longer than [`RenderBudget::DEFAULT_MAX_SAMPLES`] fail with
/// [`AudioError::Capacity`] before anything is allocated.
pub fn synthesize_seeded(
    frequency_hz: f64,
    duration_s: f64,
    sample_rate: u32,
    waveform: Waveform,
    amplitude: f64,
    seed: u32,
) -> AudioResult<SampleBuffer> {
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: duration_s,
        });
    }
    let exact = (duration_s * sample_rate as f64).round();
    if !exact.is_finite() {
        return Err(AudioError::InvalidDuration {
            duration: duration_s,
        });
    }
    let limit = RenderBudget::DEFAULT_MAX_SAMPLES as u64;
    if exact > limit as f64 {
        return Err(AudioError::Capacity {
            requested: exact as u64,
            limit,
        });
    }
    let num_samples = exact as usize;
    let samples = oscillate(
        frequency_hz,
        num_samples,
        sample_rate,
        waveform,
        amplitude,
        seed,
    )?;
    Ok(SampleBuffer::mono(samples, sample_rate))
}

/// Generates exactly `num_samples` samples of a waveform.
///
/// This is the primitive behind [`synthesize`]; the renderer calls it with
/// sample counts it has already fitted to the step grid.
pub fn oscillate(
    frequency_hz: f64,
    num_samples: usize,
    sample_rate: u32,
    waveform: Waveform,
    amplitude: f64,
    seed: u32,
) -> AudioResult<Vec<f64>> {
    if sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: sample_rate });
    }
    if !frequency_hz.is_finite() || frequency_hz < 0.0 {
        return Err(AudioError::InvalidFrequency { freq: frequency_hz });
    }
    if !(0.0..=1.0).contains(&amplitude) {
        return Err(AudioError::invalid_param(
            "oscillator.amplitude",
            format!("must be 0.0-1.0, got {}", amplitude),
        ));
    }

    if frequency_hz == 0.0 || amplitude == 0.0 {
        return Ok(vec![0.0; num_samples]);
    }

    let sr = sample_rate as f64;
    let mut output = Vec::with_capacity(num_samples);

    match waveform {
        Waveform::Noise => {
            let mut rng = create_rng(seed);
            output.extend((0..num_samples).map(|_| rng.gen_range(-1.0..=1.0) * amplitude));
        }
        Waveform::SquareHarmonics => {
            let partials = odd_harmonics(frequency_hz, sr);
            output.extend((0..num_samples).map(|i| {
                let phase = phase_at(i, frequency_hz, sr);
                let value: f64 = partials
                    .iter()
                    .map(|&k| (TWO_PI * k * phase).sin() / k)
                    .sum();
                (value * amplitude).clamp(-1.0, 1.0)
            }));
        }
        Waveform::Square | Waveform::Sine => {
            output.extend((0..num_samples).map(|i| {
                let phase = phase_at(i, frequency_hz, sr);
                let value = if waveform == Waveform::Square {
                    square(phase)
                } else {
                    (TWO_PI * phase).sin()
                };
                (value * amplitude).clamp(-1.0, 1.0)
            }));
        }
    }

    Ok(output)
}

/// Phase in [0, 1) of sample `i`.
fn phase_at(i: usize, frequency: f64, sample_rate: f64) -> f64 {
    (i as f64 * frequency / sample_rate).fract()
}

fn square(phase: f64) -> f64 {
    if phase < 0.5 {
        1.0
    } else {
        -1.0
    }
}

/// Odd harmonic numbers up to [`MAX_SQUARE_HARMONIC`] that stay below Nyquist.
///
/// The fundamental is always kept. The raw series `sum(sin(k x) / k)` peaks
/// below 1.0 for any truncation, so no extra normalization is applied.
fn odd_harmonics(frequency: f64, sample_rate: f64) -> Vec<f64> {
    let nyquist = sample_rate / 2.0;
    (1..=MAX_SQUARE_HARMONIC)
        .step_by(2)
        .map(|k| k as f64)
        .filter(|&k| k == 1.0 || k * frequency < nyquist)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rest_is_silent() {
        for waveform in Waveform::ALL {
            let buffer = synthesize(0.0, 0.1, 44100, waveform, 1.0).unwrap();
            assert_eq!(buffer.len(), 4410);
            assert!(buffer.samples().iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_sample_count_rounds() {
        // 0.01 s at 22050 Hz is 220.5 samples
        let buffer = synthesize(440.0, 0.01, 22050, Waveform::Sine, 0.5).unwrap();
        assert_eq!(buffer.len(), 221);
    }

    #[test]
    fn test_sine_shape() {
        let buffer = synthesize(1000.0, 0.001, 8000, Waveform::Sine, 1.0).unwrap();
        let s = buffer.samples();
        assert!(s[0].abs() < 1e-12);
        // Quarter period at 8 samples per cycle
        assert!((s[2] - 1.0).abs() < 1e-12);
        assert!((s[6] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_square_levels() {
        let buffer = synthesize(100.0, 0.01, 1000, Waveform::Square, 0.5).unwrap();
        let s = buffer.samples();
        assert_eq!(&s[..5], &[0.5; 5]);
        assert_eq!(&s[5..10], &[-0.5; 5]);
    }

    #[test]
    fn test_square_harmonics_band_limited() {
        // At 5 kHz and 44.1 kHz only harmonics 1 and 3 fit below Nyquist
        assert_eq!(odd_harmonics(5000.0, 44100.0), vec![1.0, 3.0]);
        assert_eq!(odd_harmonics(100.0, 44100.0).len(), 8);
        // The fundamental survives even above Nyquist
        assert_eq!(odd_harmonics(30000.0, 44100.0), vec![1.0]);
    }

    #[test]
    fn test_square_harmonics_peak_within_unit() {
        let buffer = synthesize(110.0, 0.05, 44100, Waveform::SquareHarmonics, 1.0).unwrap();
        assert!(buffer.peak() <= 1.0);
        assert!(buffer.peak() > 0.8);
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = synthesize_seeded(440.0, 0.01, 44100, Waveform::Noise, 0.8, 9).unwrap();
        let b = synthesize_seeded(440.0, 0.01, 44100, Waveform::Noise, 0.8, 9).unwrap();
        let c = synthesize_seeded(440.0, 0.01, 44100, Waveform::Noise, 0.8, 10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.peak() <= 0.8);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            synthesize(-1.0, 0.1, 44100, Waveform::Sine, 0.5),
            Err(AudioError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            synthesize(f64::NAN, 0.1, 44100, Waveform::Sine, 0.5),
            Err(AudioError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            synthesize(440.0, 0.0, 44100, Waveform::Sine, 0.5),
            Err(AudioError::InvalidDuration { .. })
        ));
        assert!(matches!(
            synthesize(440.0, 0.1, 0, Waveform::Sine, 0.5),
            Err(AudioError::InvalidSampleRate { rate: 0 })
        ));
        assert!(synthesize(440.0, 0.1, 44100, Waveform::Sine, 1.5).is_err());
    }

    #[test]
    fn test_oversized_tone_fails_before_allocation() {
        for duration in [1e7, 1e300] {
            match synthesize(440.0, duration, 44100, Waveform::Sine, 0.5) {
                Err(AudioError::Capacity { requested, limit }) => {
                    assert_eq!(limit, RenderBudget::DEFAULT_MAX_SAMPLES as u64);
                    assert!(requested > limit);
                }
                other => panic!("duration {duration}: unexpected {other:?}"),
            }
        }
        // The sample count itself overflows to infinity
        assert!(matches!(
            synthesize(440.0, f64::MAX, 44100, Waveform::Sine, 0.5),
            Err(AudioError::InvalidDuration { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_length_matches_duration(
            freq in 1.0f64..8000.0,
            duration in 0.0005f64..0.5,
            rate in prop::sample::select(vec![8000u32, 22050, 44100, 48000]),
        ) {
            let buffer = synthesize(freq, duration, rate, Waveform::SquareHarmonics, 0.7).unwrap();
            prop_assert_eq!(buffer.len(), (duration * rate as f64).round() as usize);
            prop_assert!(buffer.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
        }

        #[test]
        fn prop_deterministic(freq in 0.0f64..4000.0, seed in any::<u32>()) {
            let a = synthesize_seeded(freq, 0.02, 44100, Waveform::Noise, 0.5, seed).unwrap();
            let b = synthesize_seeded(freq, 0.02, 44100, Waveform::Noise, 0.5, seed).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
