//! Rendering to WAV, checked with an independent decoder.

use std::io::Cursor;

use seq80_backend_audio::{encode_wav, read_pcm16, render, WavResult};
use seq80_spec::{Note, Pitch, RenderConfig, Sequence, Waveform};

fn arpeggio() -> Sequence {
    Sequence::new("arp", 120, 8)
        .with_note(Note::new(Pitch::parse("C4").unwrap(), 0))
        .with_note(Note::new(Pitch::parse("E4").unwrap(), 2))
        .with_note(Note::new(Pitch::parse("G4").unwrap(), 4))
        .with_note(Note::new(Pitch::parse("C5").unwrap(), 6))
}

#[test]
fn test_concrete_scenario_sizes() {
    let buffer = render(&arpeggio(), &RenderConfig::default()).unwrap();
    assert_eq!(buffer.len(), 44096);

    let wav = WavResult::from_buffer(&buffer).unwrap();
    assert_eq!(wav.wav_data.len(), 44 + 88192);
    assert_eq!(
        u32::from_le_bytes(wav.wav_data[40..44].try_into().unwrap()),
        88192
    );
    assert_eq!(
        u32::from_le_bytes(wav.wav_data[4..8].try_into().unwrap()),
        36 + 88192
    );
}

#[test]
fn test_hound_reads_rendered_wav() {
    for channels in [1u16, 2] {
        let config = RenderConfig::default()
            .with_channels(channels)
            .with_waveform(Waveform::Sine);
        let buffer = render(&arpeggio(), &config).unwrap();
        let bytes = encode_wav(&buffer).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, channels);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let decoded: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded.len(), buffer.len());
        for (pcm, sample) in decoded.iter().zip(buffer.samples()) {
            assert_eq!(*pcm, (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16);
        }
    }
}

#[test]
fn test_pcm16_reader_agrees_with_hound() {
    let buffer = render(&arpeggio(), &RenderConfig::default().with_channels(2)).unwrap();
    let bytes = encode_wav(&buffer).unwrap();

    let ours = read_pcm16(&bytes).unwrap();
    let hound_samples: Vec<f64> = hound::WavReader::new(Cursor::new(&bytes))
        .unwrap()
        .into_samples::<i16>()
        .map(|s| s.unwrap() as f64 / 32767.0)
        .collect();

    assert_eq!(ours.channels(), 2);
    assert_eq!(ours.samples(), hound_samples.as_slice());
}

#[test]
fn test_every_waveform_renders_deterministically() {
    for waveform in Waveform::ALL {
        let config = RenderConfig::default().with_waveform(waveform);
        let a = WavResult::from_buffer(&render(&arpeggio(), &config).unwrap()).unwrap();
        let b = WavResult::from_buffer(&render(&arpeggio(), &config).unwrap()).unwrap();
        assert_eq!(a.pcm_hash, b.pcm_hash, "{} not deterministic", waveform.as_str());
    }
}
