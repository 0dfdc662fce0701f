// Rope geometry to synth parameter mapping, pitch helpers and note names.

use glam::Vec2;
use ropesynth_core::scales::{
    note, notes, PitchClass, ARPEGGIO_SEQUENCE, BASS_SEQUENCE, CONST_SEQUENCE, HIGHEST_NOTE, LOWEST_NOTE,
    PENTATONIC_SCALE, PENTATONIC_SEQUENCE, TEST_SEQUENCE,
};
use ropesynth_core::{
    cutoff_from_length, frequency_from_direction, lerp, lerp_vec2, midi_to_hz,
    modulator_from_length, note_name, sector_index, RopeGeometry, MAX_MOD_HZ, SCALE_SIZE,
    SEQ_SIZE,
};

fn geometry(dx: f32, dy: f32) -> RopeGeometry {
    RopeGeometry {
        start: Vec2::new(400.0, 400.0),
        end: Vec2::new(400.0 + dx, 400.0 + dy),
    }
}

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    let a4 = midi_to_hz(69.0);
    assert!((a4 - 440.0).abs() < 1e-4);
    let a5 = midi_to_hz(81.0);
    assert!((a5 - 880.0).abs() < 1e-3);
    assert!((a5 / a4 - 2.0).abs() < 1e-4);
}

#[test]
fn midi_to_hz_is_monotonic_over_range() {
    let mut prev = midi_to_hz(20.0);
    for m in 21..=100 {
        let f = midi_to_hz(m as f32);
        assert!(f > prev, "frequency not increasing at midi {m}");
        prev = f;
    }
}

#[test]
fn note_names_follow_midi_octaves() {
    assert_eq!(note_name(69), "A4");
    assert_eq!(note_name(60), "C4");
    assert_eq!(note_name(49), "C#3");
    assert_eq!(note(PitchClass::A, 4), 69);
    assert_eq!(note(PitchClass::C, 4), 60);
}

#[test]
fn note_tables_stay_within_range() {
    assert_eq!(LOWEST_NOTE, 24);
    assert_eq!(HIGHEST_NOTE, 83);
    assert_eq!(PENTATONIC_SCALE.len(), SCALE_SIZE);
    for seq in [
        PENTATONIC_SEQUENCE,
        BASS_SEQUENCE,
        ARPEGGIO_SEQUENCE,
        CONST_SEQUENCE,
        TEST_SEQUENCE,
    ] {
        assert_eq!(seq.len(), SEQ_SIZE);
        assert!(seq.iter().all(|n| (LOWEST_NOTE..=HIGHEST_NOTE).contains(n)));
    }
    assert!(PENTATONIC_SCALE.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn named_notes_cover_c1_to_b5() {
    assert_eq!(notes::C1, LOWEST_NOTE);
    assert_eq!(notes::Cs1, 25);
    assert_eq!(notes::A3, 57);
    assert_eq!(notes::C4, 60);
    assert_eq!(notes::As4, 70);
    assert_eq!(notes::B5, HIGHEST_NOTE);
    assert_eq!(note_name(notes::Fs2), "F#2");
}

#[test]
fn sector_boundaries_sit_on_multiples_of_step() {
    let sectors = 10;
    for k in 0..sectors {
        let boundary = k as f32 * 36.0 - 180.0;
        assert_eq!(
            sector_index(boundary, sectors),
            k,
            "boundary {boundary} should open sector {k}"
        );
        assert_eq!(sector_index(boundary + 18.0, sectors), k);
    }
    // Just below a boundary still belongs to the previous sector.
    assert_eq!(sector_index(-144.01, sectors), 0);
}

#[test]
fn sector_index_is_invariant_under_full_turns() {
    for k in 0..20 {
        let angle = -170.0 + 17.0 * k as f32;
        let base = sector_index(angle, 9);
        assert_eq!(sector_index(angle + 360.0, 9), base, "angle {angle}");
        assert_eq!(sector_index(angle - 360.0, 9), base, "angle {angle}");
    }
}

#[test]
fn sector_index_degenerate_inputs_give_zero() {
    assert_eq!(sector_index(45.0, 0), 0);
    assert_eq!(sector_index(f32::NAN, 8), 0);
    assert_eq!(sector_index(f32::INFINITY, 8), 0);
}

#[test]
fn pointing_along_negative_x_selects_first_entry() {
    let scale: [i32; 9] = [60, 62, 64, 65, 67, 69, 71, 72, 74];
    let rope = geometry(-100.0, 0.0);
    let hz = frequency_from_direction(&rope, &scale);
    assert!((hz - midi_to_hz(60.0)).abs() < 1e-3, "got {hz}");
}

#[test]
fn hanging_rope_picks_sector_below_anchor() {
    // Straight down is +90 degrees in window coordinates.
    let rope = geometry(0.0, 100.0);
    let expected = sector_index(90.0, PENTATONIC_SCALE.len());
    let hz = frequency_from_direction(&rope, PENTATONIC_SCALE);
    assert!((hz - midi_to_hz(PENTATONIC_SCALE[expected] as f32)).abs() < 1e-3);
}

#[test]
fn empty_scale_gives_silence() {
    assert_eq!(frequency_from_direction(&geometry(10.0, 0.0), &[]), 0.0);
}

#[test]
fn cutoff_clamps_to_range() {
    assert_eq!(cutoff_from_length(0.0, 100.0, 4000.0, 400.0), 100.0);
    assert_eq!(cutoff_from_length(400.0, 100.0, 4000.0, 400.0), 4000.0);
    assert_eq!(cutoff_from_length(1e6, 100.0, 4000.0, 400.0), 4000.0);
    assert_eq!(cutoff_from_length(-50.0, 100.0, 4000.0, 400.0), 100.0);
    let mid = cutoff_from_length(200.0, 100.0, 4000.0, 400.0);
    assert!((mid - 2050.0).abs() < 1e-3);
    assert_eq!(cutoff_from_length(200.0, 100.0, 4000.0, 0.0), 100.0);
}

#[test]
fn modulator_rate_follows_length() {
    assert_eq!(modulator_from_length(0.0), 0.0);
    assert!((modulator_from_length(400.0) - MAX_MOD_HZ).abs() < 1e-6);
    assert!(modulator_from_length(100.0) < modulator_from_length(300.0));
}

#[test]
fn geometry_angle_and_length() {
    let g = geometry(30.0, 40.0);
    assert!((g.length() - 50.0).abs() < 1e-4);
    let right = geometry(10.0, 0.0);
    assert!(right.angle_degrees().abs() < 1e-4);
    let down = geometry(0.0, 10.0);
    assert!((down.angle_degrees() - 90.0).abs() < 1e-4);
}

#[test]
fn lerp_helpers() {
    assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
    let v = lerp_vec2(Vec2::ZERO, Vec2::new(10.0, -10.0), 0.25);
    assert_eq!(v, Vec2::new(2.5, -2.5));
}
