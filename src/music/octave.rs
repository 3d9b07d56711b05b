// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Octave assignment for ascending note sequences.
//!
//! The octave rolls over whenever the base letter moves backwards in the
//! C-D-E-F-G-A-B cycle. `Cb` and `Fb` are compared as `B` and `E` so that
//! `Cb` stays in the register of the `B` below it. `B#` and `E#` keep their
//! own letters, so `B#4` sounds as C5.

use super::note::{Accidental, Letter, Note};

/// Octave the first note of a scale is placed in
pub const DEFAULT_START_OCTAVE: i32 = 4;

/// Letter a note is compared under when tracking octave rollover
pub fn base_letter(note: Note) -> Letter {
    match (note.letter(), note.accidental()) {
        (Letter::C, Accidental::Flat) => Letter::B,
        (Letter::F, Accidental::Flat) => Letter::E,
        (letter, _) => letter,
    }
}

/// Assign an octave to every note of an ascending sequence.
///
/// The first note gets `start_octave`; each later note increments the
/// octave when its base letter comes earlier in the cycle than the
/// previous note's base letter. The output is never decreasing and
/// differs from `start_octave` by at most one for a scale plus its
/// octave root.
pub fn assign_octaves(notes: &[Note], start_octave: i32) -> Vec<i32> {
    let mut octaves = Vec::with_capacity(notes.len());
    let Some(&first) = notes.first() else {
        return octaves;
    };

    let mut octave = start_octave;
    let mut previous = base_letter(first);
    for (i, &note) in notes.iter().enumerate() {
        let base = base_letter(note);
        if i > 0 && base.position() < previous.position() {
            octave += 1;
        }
        octaves.push(octave);
        previous = base;
    }
    octaves
}
