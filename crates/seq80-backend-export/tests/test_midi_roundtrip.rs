//! MIDI export round-trips through the SMF reader.

use proptest::prelude::*;
use seq80_backend_export::midi::ticks_per_step;
use seq80_backend_export::{read_midi, write_midi, ExportError, PPQ};
use seq80_spec::{Note, NoteDuration, Pitch, Sequence};

fn sequence_from(tempo: u16, spb: u32, cells: &[Option<(u8, f64, f64)>]) -> Sequence {
    let mut seq = Sequence::new("prop", tempo, cells.len() as u32).with_steps_per_beat(spb);
    for (step, cell) in cells.iter().enumerate() {
        if let Some((key, velocity, length)) = *cell {
            seq = seq.with_note(
                Note::new(Pitch::from_midi(key), step as u32)
                    .with_velocity(velocity)
                    .with_duration(NoteDuration::Steps(length)),
            );
        }
    }
    seq
}

proptest! {
    #[test]
    fn pitches_and_timing_survive(
        tempo in 60u16..=200,
        spb in prop::sample::select(vec![1u32, 2, 3, 4, 6, 8, 12, 16]),
        cells in prop::collection::vec(
            prop::option::of((0u8..=127, 0.0f64..=1.0, 0.05f64..2.0)),
            1..48,
        ),
    ) {
        let seq = sequence_from(tempo, spb, &cells);
        let tps = ticks_per_step(&seq).unwrap() as u64;
        let file = read_midi(&write_midi(&seq).unwrap()).unwrap();

        let expected: Vec<u8> = seq.notes.iter().map(|n| n.pitch.number()).collect();
        prop_assert_eq!(file.pitches(), expected);
        prop_assert_eq!(file.ppq, PPQ);
        prop_assert_eq!(file.end_tick, seq.steps as u64 * tps);

        for (decoded, note) in file.notes.iter().zip(&seq.notes) {
            prop_assert_eq!(decoded.tick, note.step as u64 * tps);
            prop_assert!(decoded.length >= 1 && decoded.length <= tps);
            prop_assert!(decoded.velocity >= 1 && decoded.velocity <= 127);
        }

        let bpm = file.tempo_bpm().unwrap();
        prop_assert!((bpm - tempo as f64).abs() < 0.01);
    }
}

#[test]
fn concrete_arpeggio() {
    let seq = Sequence::new("arp", 120, 8)
        .with_note(Note::new(Pitch::parse("C4").unwrap(), 0))
        .with_note(Note::new(Pitch::parse("E4").unwrap(), 2))
        .with_note(Note::new(Pitch::parse("G4").unwrap(), 4))
        .with_note(Note::new(Pitch::parse("C5").unwrap(), 6));
    let bytes = write_midi(&seq).unwrap();

    assert_eq!(&bytes[..4], b"MThd");
    assert_eq!(&bytes[8..14], &[0, 0, 0, 1, 0x01, 0xE0]);
    assert_eq!(&bytes[14..18], b"MTrk");

    let file = read_midi(&bytes).unwrap();
    assert_eq!(file.pitches(), vec![60, 64, 67, 72]);
    let ticks: Vec<u64> = file.notes.iter().map(|n| n.tick).collect();
    assert_eq!(ticks, vec![0, 240, 480, 720]);
    assert_eq!(file.end_tick, 960);
    assert_eq!(file.micros_per_quarter, Some(500_000));
}

#[test]
fn out_of_range_pitch_names_the_step() {
    let seq = Sequence::new("high", 120, 4).with_note(Note::new(Pitch::parse("A#9").unwrap(), 2));
    let err = write_midi(&seq).unwrap_err();
    assert!(err.to_string().contains("step 2 (A#9)"), "{err}");
    assert!(matches!(err, ExportError::Unrepresentable { .. }));
}
