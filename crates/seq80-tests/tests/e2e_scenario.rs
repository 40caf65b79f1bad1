//! The reference scenario: an 8-step arpeggio at 120 BPM and 44.1 kHz.

use pretty_assertions::assert_eq;
use seq80_backend_audio::{encode_wav, render, StepTiming};
use seq80_backend_export::{export_sequence_as, read_midi, ExportFormat};
use seq80_spec::RenderConfig;
use seq80_tests::fixtures::arpeggio;
use seq80_tests::{validate_smf, validate_wav};

#[test]
fn test_arpeggio_render_layout() {
    let seq = arpeggio();
    let timing = StepTiming::new(&seq, 44100).unwrap();
    assert_eq!(timing.step_samples(), 5512);

    let buffer = render(&seq, &RenderConfig::default()).unwrap();
    assert_eq!(buffer.len(), 44096);

    // Odd steps hold no note
    for step in [1, 3, 5, 7] {
        let range = timing.sample_range(step);
        let slice = &buffer.samples()[range.start as usize..range.end as usize];
        assert!(slice.iter().all(|&s| s == 0.0), "step {step} not silent");
    }
    for step in [0, 2, 4, 6] {
        let range = timing.sample_range(step);
        let slice = &buffer.samples()[range.start as usize..range.end as usize];
        assert!(slice.iter().any(|&s| s != 0.0), "step {step} silent");
    }
}

#[test]
fn test_arpeggio_wav_bytes() {
    let buffer = render(&arpeggio(), &RenderConfig::default()).unwrap();
    let wav = encode_wav(&buffer).unwrap();
    assert_eq!(wav.len(), 44 + 88192);

    let info = validate_wav(&wav).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.byte_rate, 88200);
    assert_eq!(info.data_size, 88192);
    assert_eq!(info.num_frames(), 44096);
}

#[test]
fn test_arpeggio_midi() {
    let artifact = export_sequence_as(&arpeggio(), ExportFormat::Midi).unwrap();
    let info = validate_smf(&artifact.bytes).unwrap();
    assert_eq!((info.format, info.tracks, info.division), (0, 1, 480));

    let midi = read_midi(&artifact.bytes).unwrap();
    assert_eq!(midi.micros_per_quarter, Some(500_000));
    assert_eq!(midi.end_tick, 960);
    let ticks: Vec<u64> = midi.notes.iter().map(|n| n.tick).collect();
    assert_eq!(ticks, vec![0, 240, 480, 720]);
    assert_eq!(midi.pitches(), vec![60, 64, 67, 72]);
}

#[test]
fn test_arpeggio_text_formats() {
    let text = export_sequence_as(&arpeggio(), ExportFormat::Txt).unwrap();
    let text = String::from_utf8(text.bytes).unwrap();
    assert!(text.contains("Tempo: 120 BPM"));
    assert!(text.contains("Step  1: C4"));
    assert!(text.contains("Step  2: (rest)"));
    assert!(text.contains("Step  7: C5"));

    let csv = export_sequence_as(&arpeggio(), ExportFormat::Csv).unwrap();
    let csv = String::from_utf8(csv.bytes).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("1,C4,60,261.63,"));
    assert!(lines[4].starts_with("7,C5,72,523.25,"));
}
