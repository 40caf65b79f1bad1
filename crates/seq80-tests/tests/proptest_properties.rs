//! Property tests for the oscillator, pitches and effect parameters.

use proptest::prelude::*;
use seq80_backend_audio::{synthesize_seeded, Effect, EffectChain, SampleBuffer};
use seq80_spec::{DistortionCurve, EffectSpec, Pitch, Waveform};

fn waveform() -> impl Strategy<Value = Waveform> {
    prop::sample::select(Waveform::ALL.to_vec())
}

fn sample_rate() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![8000u32, 22050, 44100, 48000, 96000])
}

fn signal() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0f64..=1.0, 1..512)
}

proptest! {
    #[test]
    fn oscillator_length_is_rounded_duration(
        freq in 20.0f64..8000.0,
        duration in 0.001f64..0.5,
        sr in sample_rate(),
        wave in waveform(),
        seed in any::<u32>(),
    ) {
        let buffer = synthesize_seeded(freq, duration, sr, wave, 0.8, seed).unwrap();
        prop_assert_eq!(buffer.len(), (duration * sr as f64).round() as usize);
        prop_assert!(buffer.samples().iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn zero_frequency_is_silence(
        duration in 0.001f64..0.5,
        sr in sample_rate(),
        wave in waveform(),
    ) {
        let buffer = synthesize_seeded(0.0, duration, sr, wave, 1.0, 1).unwrap();
        prop_assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn pitch_name_roundtrips(number in 0u8..=131) {
        let pitch = Pitch::from_midi(number);
        let parsed = Pitch::parse(&pitch.to_string()).unwrap();
        prop_assert_eq!(parsed, pitch);
        prop_assert_eq!(pitch.midi_number().is_some(), number <= 127);
    }

    #[test]
    fn pitch_frequency_doubles_per_octave(number in 0u8..=119) {
        let low = Pitch::from_midi(number).frequency();
        let high = Pitch::from_midi(number + 12).frequency();
        prop_assert!((high / low - 2.0).abs() < 1e-9);
    }

    #[test]
    fn neutral_effects_are_identity(samples in signal(), stereo in any::<bool>()) {
        let mut input = SampleBuffer::mono(samples, 44100);
        if stereo {
            input = input.into_stereo();
        }
        let specs = vec![
            EffectSpec::Delay { time_ms: 50.0, feedback: 0.5, mix: 0.0, tail: false },
            EffectSpec::Reverb { room_size: 0.8, damping: 0.5, decay: 0.5, mix: 0.0, tail: false },
            EffectSpec::Tremolo { rate_hz: 6.0, depth: 0.0 },
            EffectSpec::Distortion { drive: 0.0, curve: DistortionCurve::Hard, output_gain: 2.0 },
        ];
        let mut chain = EffectChain::from_specs(&specs, 44100).unwrap();
        prop_assert_eq!(chain.process(input.clone()), input);
    }

    #[test]
    fn unstable_delay_feedback_is_rejected(feedback in 0.95f64..10.0) {
        let spec = EffectSpec::Delay { time_ms: 100.0, feedback, mix: 0.5, tail: false };
        prop_assert!(Effect::from_spec(&spec, 44100).is_err());
    }

    #[test]
    fn unstable_flanger_feedback_is_rejected(magnitude in 0.95f64..10.0, negative in any::<bool>()) {
        let feedback = if negative { -magnitude } else { magnitude };
        let spec = EffectSpec::Flanger { rate_hz: 0.5, depth_ms: 2.0, feedback, mix: 0.5 };
        prop_assert!(Effect::from_spec(&spec, 44100).is_err());
    }

    #[test]
    fn stable_effects_stay_finite(samples in signal(), feedback in 0.0f64..0.94) {
        let specs = vec![
            EffectSpec::Delay { time_ms: 2.0, feedback, mix: 0.5, tail: true },
            EffectSpec::Flanger { rate_hz: 1.0, depth_ms: 1.0, feedback, mix: 0.5 },
        ];
        let mut chain = EffectChain::from_specs(&specs, 8000).unwrap();
        let output = chain.process(SampleBuffer::mono(samples, 8000));
        prop_assert!(output.samples().iter().all(|s| s.is_finite()));
    }
}
