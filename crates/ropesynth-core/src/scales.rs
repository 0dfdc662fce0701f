//! Note-name tables, fixed melodic sequences and the MIDI → Hz conversion.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitchClass {
    C = 0,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

use PitchClass::*;

pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// MIDI number of a pitch class in a given octave (C4 = 60).
pub const fn note(pc: PitchClass, octave: i32) -> i32 {
    12 * (octave + 1) + pc as i32
}

/// Lowest and highest notes covered by the sequence tables (C1..B5).
pub const LOWEST_NOTE: i32 = note(C, 1);
pub const HIGHEST_NOTE: i32 = note(B, 5);

/// Named MIDI numbers for every note from C1 (24) to B5 (83).
pub mod notes {
    #![allow(non_upper_case_globals)]

    use super::{note, PitchClass::*};

    pub const C1: i32 = note(C, 1);
    pub const Cs1: i32 = note(Cs, 1);
    pub const D1: i32 = note(D, 1);
    pub const Ds1: i32 = note(Ds, 1);
    pub const E1: i32 = note(E, 1);
    pub const F1: i32 = note(F, 1);
    pub const Fs1: i32 = note(Fs, 1);
    pub const G1: i32 = note(G, 1);
    pub const Gs1: i32 = note(Gs, 1);
    pub const A1: i32 = note(A, 1);
    pub const As1: i32 = note(As, 1);
    pub const B1: i32 = note(B, 1);

    pub const C2: i32 = note(C, 2);
    pub const Cs2: i32 = note(Cs, 2);
    pub const D2: i32 = note(D, 2);
    pub const Ds2: i32 = note(Ds, 2);
    pub const E2: i32 = note(E, 2);
    pub const F2: i32 = note(F, 2);
    pub const Fs2: i32 = note(Fs, 2);
    pub const G2: i32 = note(G, 2);
    pub const Gs2: i32 = note(Gs, 2);
    pub const A2: i32 = note(A, 2);
    pub const As2: i32 = note(As, 2);
    pub const B2: i32 = note(B, 2);

    pub const C3: i32 = note(C, 3);
    pub const Cs3: i32 = note(Cs, 3);
    pub const D3: i32 = note(D, 3);
    pub const Ds3: i32 = note(Ds, 3);
    pub const E3: i32 = note(E, 3);
    pub const F3: i32 = note(F, 3);
    pub const Fs3: i32 = note(Fs, 3);
    pub const G3: i32 = note(G, 3);
    pub const Gs3: i32 = note(Gs, 3);
    pub const A3: i32 = note(A, 3);
    pub const As3: i32 = note(As, 3);
    pub const B3: i32 = note(B, 3);

    pub const C4: i32 = note(C, 4);
    pub const Cs4: i32 = note(Cs, 4);
    pub const D4: i32 = note(D, 4);
    pub const Ds4: i32 = note(Ds, 4);
    pub const E4: i32 = note(E, 4);
    pub const F4: i32 = note(F, 4);
    pub const Fs4: i32 = note(Fs, 4);
    pub const G4: i32 = note(G, 4);
    pub const Gs4: i32 = note(Gs, 4);
    pub const A4: i32 = note(A, 4);
    pub const As4: i32 = note(As, 4);
    pub const B4: i32 = note(B, 4);

    pub const C5: i32 = note(C, 5);
    pub const Cs5: i32 = note(Cs, 5);
    pub const D5: i32 = note(D, 5);
    pub const Ds5: i32 = note(Ds, 5);
    pub const E5: i32 = note(E, 5);
    pub const F5: i32 = note(F, 5);
    pub const Fs5: i32 = note(Fs, 5);
    pub const G5: i32 = note(G, 5);
    pub const Gs5: i32 = note(Gs, 5);
    pub const A5: i32 = note(A, 5);
    pub const As5: i32 = note(As, 5);
    pub const B5: i32 = note(B, 5);
}

/// Scale sampled by the lead voice's rope direction, one entry per sector.
pub const PENTATONIC_SCALE: &[i32] = &[
    note(A, 3),
    note(C, 4),
    note(D, 4),
    note(E, 4),
    note(G, 4),
    note(A, 4),
    note(C, 5),
    note(D, 5),
    note(E, 5),
    note(G, 5),
];

pub const PENTATONIC_SEQUENCE: &[i32] = &[
    note(A, 3),
    note(C, 4),
    note(D, 4),
    note(E, 4),
    note(G, 4),
    note(A, 4),
    note(G, 4),
    note(E, 4),
];

pub const BASS_SEQUENCE: &[i32] = &[
    note(A, 1),
    note(A, 1),
    note(C, 2),
    note(D, 2),
    note(E, 2),
    note(G, 2),
    note(A, 2),
    note(E, 2),
];

pub const ARPEGGIO_SEQUENCE: &[i32] = &[
    note(A, 3),
    note(C, 4),
    note(E, 4),
    note(G, 4),
    note(A, 4),
    note(C, 5),
    note(E, 5),
    note(G, 5),
];

pub const CONST_SEQUENCE: &[i32] = &[
    note(A, 1),
    note(E, 2),
    note(A, 2),
    note(C, 3),
    note(E, 2),
    note(A, 1),
    note(D, 2),
    note(G, 2),
];

pub const TEST_SEQUENCE: &[i32] = &[
    note(C, 4),
    note(D, 4),
    note(E, 4),
    note(F, 4),
    note(G, 4),
    note(A, 4),
    note(B, 4),
    note(C, 5),
];

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Human-readable name such as `"A4"` or `"C#3"`.
pub fn note_name(midi: i32) -> String {
    let pc = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", PITCH_CLASS_NAMES[pc], octave)
}
