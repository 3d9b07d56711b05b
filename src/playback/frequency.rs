// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note frequencies.
//!
//! Frequencies come from a fixed table at octave 4, indexed by the note's
//! register offset, so enharmonic spellings share a value and `Cb`/`B#`
//! land on the same side of the octave line as the octave engine files
//! them.

use tracing::error;

use crate::music::Note;

/// Concert A
pub const A4_HZ: f64 = 440.0;

/// Frequencies for register offsets 0 (C4) through 13 (C#5).
///
/// Indexed by register offset rather than pitch class, so `B#` and `B##`
/// sit above the octave's `B` (523.25 Hz and 554.37 Hz in octave 4) instead
/// of sharing the base values of `C` and `C#`. The octave engine files them
/// under the B's octave, and this keeps them sounding above it.
const BASE_FREQUENCIES: [f64; 14] = [
    261.63, // C
    277.18, // C#/Db
    293.66, // D
    311.13, // D#/Eb
    329.63, // E/Fb
    349.23, // F/E#
    369.99, // F#/Gb
    392.00, // G
    415.30, // G#/Ab
    440.00, // A
    466.16, // A#/Bb
    493.88, // B/Cb
    523.25, // B#
    554.37, // B##
];

/// Frequency of a spelled note in an engine-assigned octave
pub fn note_frequency(note: Note, octave: i32) -> f64 {
    let base = usize::try_from(note.register_offset())
        .ok()
        .and_then(|i| BASE_FREQUENCIES.get(i))
        .copied()
        .unwrap_or_else(|| {
            error!("No base frequency for {}", note);
            A4_HZ
        });
    base * 2f64.powi(octave - 4)
}

/// Frequency for a note name, falling back to A4 for unknown spellings
pub fn frequency_for_name(name: &str, octave: i32) -> f64 {
    match name.parse::<Note>() {
        Ok(note) => note_frequency(note, octave),
        Err(e) => {
            error!("Unknown note {:?} ({}), playing A4", name, e);
            A4_HZ
        }
    }
}
