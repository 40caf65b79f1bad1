//! Linear attack/release ramps applied to each rendered note.

use seq80_spec::EnvelopeConfig;

/// Applies a linear fade-in and fade-out to `samples` in place.
///
/// Each ramp is limited to half of the note so short notes still reach their
/// peak. A zero-length ramp leaves that edge untouched.
pub fn apply_envelope(samples: &mut [f64], envelope: &EnvelopeConfig, sample_rate: u32) {
    let len = samples.len();
    if len == 0 {
        return;
    }
    let half = len / 2;
    let attack = ramp_samples(envelope.attack_ms, sample_rate).min(half);
    let release = ramp_samples(envelope.release_ms, sample_rate).min(half);

    for (i, sample) in samples.iter_mut().take(attack).enumerate() {
        *sample *= i as f64 / attack as f64;
    }
    for (i, sample) in samples.iter_mut().rev().take(release).enumerate() {
        *sample *= i as f64 / release as f64;
    }
}

fn ramp_samples(ms: f64, sample_rate: u32) -> usize {
    (ms * 0.001 * sample_rate as f64).round() as usize
}
