// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rendering model for keyboard and staff collaborators.
//!
//! Everything here is derived from the same `(Note, octave)` pairs the
//! audio path plays, so the key that lights up, the staff position and the
//! sounding pitch always agree.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::note::{Accidental, Letter, Note};
use super::octave::assign_octaves;
use super::scale::{Scale, ScaleForm, ScaleType};

/// Sharp-family key names, indexed by pitch class
const KEY_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A spelled note placed in an octave by the octave engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    /// Literal spelling
    pub note: Note,
    /// Octave number as assigned by the octave engine
    pub octave: i32,
}

impl Pitch {
    pub fn new(note: Note, octave: i32) -> Self {
        Self { note, octave }
    }

    /// Text label such as "Ab4"
    pub fn label(&self) -> String {
        format!("{}{}", self.note, self.octave)
    }

    /// Sounding MIDI note number (C4 = 60)
    pub fn midi(&self) -> i32 {
        (self.octave + 1) * 12 + self.note.register_offset() as i32
    }

    /// The physical key this pitch sounds on
    pub fn keyboard_key(&self) -> KeyboardKey {
        KeyboardKey::from_midi(self.midi())
    }

    /// Octave used to place the note on a staff.
    ///
    /// Staff notation numbers octaves by letter, so a `Cb` that sounds as
    /// B4 is written as Cb5.
    pub fn written_octave(&self) -> i32 {
        if self.note.letter() == Letter::C && self.note.accidental().is_flat() {
            self.octave + 1
        } else {
            self.octave
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

/// A piano key in canonical sharp-family naming
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyboardKey {
    /// Key name, e.g. "C#"
    pub name: String,
    /// Scientific octave of the key
    pub octave: i32,
    /// True for black keys
    pub black: bool,
}

impl KeyboardKey {
    /// Key for a MIDI note number
    pub fn from_midi(midi: i32) -> Self {
        let name = KEY_NAMES[midi.rem_euclid(12) as usize];
        Self {
            name: name.to_string(),
            octave: midi.div_euclid(12) - 1,
            black: name.ends_with('#'),
        }
    }

    /// Label such as "C#5"
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.octave)
    }
}

/// Assign octaves to a scale form plus its octave root (8 pitches)
pub fn display_pitches(scale: &Scale, form: ScaleForm, start_octave: i32) -> Vec<Pitch> {
    let notes = scale.with_octave_root(form);
    let octaves = assign_octaves(&notes, start_octave);
    notes
        .into_iter()
        .zip(octaves)
        .map(|(note, octave)| Pitch::new(note, octave))
        .collect()
}

/// Key signature as a count of sharps (positive) or flats (negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySignature {
    accidentals: i8,
}

const SHARP_ORDER: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

const FLAT_ORDER: [Letter; 7] = [
    Letter::B,
    Letter::E,
    Letter::A,
    Letter::D,
    Letter::G,
    Letter::C,
    Letter::F,
];

const MAJOR_KEYS: [(&str, i8); 15] = [
    ("C", 0),
    ("G", 1),
    ("D", 2),
    ("A", 3),
    ("E", 4),
    ("B", 5),
    ("F#", 6),
    ("C#", 7),
    ("F", -1),
    ("Bb", -2),
    ("Eb", -3),
    ("Ab", -4),
    ("Db", -5),
    ("Gb", -6),
    ("Cb", -7),
];

const MINOR_KEYS: [(&str, i8); 15] = [
    ("A", 0),
    ("E", 1),
    ("B", 2),
    ("F#", 3),
    ("C#", 4),
    ("G#", 5),
    ("D#", 6),
    ("A#", 7),
    ("D", -1),
    ("G", -2),
    ("C", -3),
    ("F", -4),
    ("Bb", -5),
    ("Eb", -6),
    ("Ab", -7),
];

impl KeySignature {
    /// Signature with `n` sharps (positive) or flats (negative), clamped to 7
    pub fn new(accidentals: i8) -> Self {
        Self {
            accidentals: accidentals.clamp(-7, 7),
        }
    }

    /// Signature for a scale's root and type.
    ///
    /// Harmonic and melodic minor use the natural-minor signature; their
    /// raised degrees are drawn as accidentals.
    pub fn for_scale(scale: &Scale) -> Option<Self> {
        let root = scale.root()?;
        Self::for_root(root, scale.scale_type())
    }

    /// Signature for a root note and scale type
    pub fn for_root(root: Note, scale_type: ScaleType) -> Option<Self> {
        let table = if scale_type.is_minor() {
            &MINOR_KEYS
        } else {
            &MAJOR_KEYS
        };
        let root = root.to_string();
        table
            .iter()
            .find(|(name, _)| *name == root)
            .map(|&(_, count)| Self::new(count))
    }

    /// Number of sharps
    pub fn sharps(&self) -> u8 {
        self.accidentals.max(0) as u8
    }

    /// Number of flats
    pub fn flats(&self) -> u8 {
        (-self.accidentals).max(0) as u8
    }

    /// Accidental the signature applies to a letter
    pub fn accidental_for(&self, letter: Letter) -> Accidental {
        if SHARP_ORDER[..self.sharps() as usize].contains(&letter) {
            Accidental::Sharp
        } else if FLAT_ORDER[..self.flats() as usize].contains(&letter) {
            Accidental::Flat
        } else {
            Accidental::Natural
        }
    }

    /// Accidental mark to draw next to a note on the staff.
    ///
    /// Sharps, flats and doubles are always drawn. Naturals get a natural
    /// sign only when the signature would otherwise alter the letter.
    pub fn mark_for(&self, note: Note) -> AccidentalMark {
        match note.accidental() {
            Accidental::DoubleFlat => AccidentalMark::DoubleFlat,
            Accidental::Flat => AccidentalMark::Flat,
            Accidental::Sharp => AccidentalMark::Sharp,
            Accidental::DoubleSharp => AccidentalMark::DoubleSharp,
            Accidental::Natural => {
                if self.accidental_for(note.letter()) == Accidental::Natural {
                    AccidentalMark::None
                } else {
                    AccidentalMark::Natural
                }
            }
        }
    }
}

/// Accidental glyph drawn beside a staff note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccidentalMark {
    None,
    Natural,
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

/// A note as placed on the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffNote {
    pub letter: Letter,
    pub written_octave: i32,
    pub mark: AccidentalMark,
}

/// Staff notes for a scale form, octave root included
pub fn staff_notes(scale: &Scale, form: ScaleForm, start_octave: i32) -> Vec<StaffNote> {
    let signature = KeySignature::for_scale(scale).unwrap_or_default();
    display_pitches(scale, form, start_octave)
        .into_iter()
        .map(|p| StaffNote {
            letter: p.note.letter(),
            written_octave: p.written_octave(),
            mark: signature.mark_for(p.note),
        })
        .collect()
}

impl Default for KeySignature {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Which display slot and pitch are currently sounding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    /// Position in ascending display order (0-7)
    pub display_index: usize,
    /// Pitch being played
    pub pitch: Pitch,
}

impl Highlight {
    pub fn new(display_index: usize, pitch: Pitch) -> Self {
        Self {
            display_index,
            pitch,
        }
    }

    /// Whether a keyboard key should be lit
    pub fn lights_key(&self, key: &KeyboardKey) -> bool {
        self.pitch.keyboard_key() == *key
    }

    /// Whether a staff slot should be lit
    pub fn lights_slot(&self, display_index: usize) -> bool {
        self.display_index == display_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::catalog::{all_scales, find};
    use crate::music::octave::DEFAULT_START_OCTAVE;

    fn pitch(name: &str, octave: i32) -> Pitch {
        Pitch::new(name.parse().unwrap(), octave)
    }

    #[test]
    fn test_keyboard_canonicalization() {
        assert_eq!(pitch("B#", 4).keyboard_key().label(), "C5");
        assert_eq!(pitch("E#", 5).keyboard_key().label(), "F5");
        assert_eq!(pitch("Fb", 5).keyboard_key().label(), "E5");
        assert_eq!(pitch("Db", 4).keyboard_key().label(), "C#4");
        assert_eq!(pitch("Cb", 4).keyboard_key().label(), "B4");
        assert_eq!(pitch("F##", 4).keyboard_key().label(), "G4");
        assert!(pitch("Db", 4).keyboard_key().black);
        assert!(!pitch("E#", 4).keyboard_key().black);
    }

    #[test]
    fn test_written_octave() {
        assert_eq!(pitch("Cb", 4).written_octave(), 5);
        assert_eq!(pitch("B#", 4).written_octave(), 4);
        assert_eq!(pitch("Ab", 4).written_octave(), 4);
    }

    #[test]
    fn test_label_and_midi() {
        assert_eq!(pitch("Ab", 4).label(), "Ab4");
        assert_eq!(pitch("C", 4).midi(), 60);
        assert_eq!(pitch("A", 4).midi(), 69);
    }

    #[test]
    fn test_octave_root_is_twelve_semitones_up() {
        for scale in all_scales() {
            for form in [ScaleForm::Ascending, ScaleForm::Descending] {
                let pitches = display_pitches(scale, form, DEFAULT_START_OCTAVE);
                assert_eq!(pitches.len(), 8);
                assert_eq!(pitches[7].midi() - pitches[0].midi(), 12, "{}", scale.name());
                assert!(
                    pitches.windows(2).all(|w| w[0].midi() < w[1].midi()),
                    "{} is not strictly ascending",
                    scale.name()
                );
            }
        }
    }

    #[test]
    fn test_key_signatures() {
        let sig = |name: &str| KeySignature::for_scale(find(name).unwrap()).unwrap();
        assert_eq!(sig("C Major").sharps(), 0);
        assert_eq!(sig("C# Major").sharps(), 7);
        assert_eq!(sig("Ab Natural Minor").flats(), 7);
        assert_eq!(sig("Ab Harmonic Minor").flats(), 7);
        assert_eq!(sig("F# Melodic Minor").sharps(), 3);
        assert_eq!(
            KeySignature::for_root("Gb".parse().unwrap(), ScaleType::Major),
            Some(KeySignature::new(-6))
        );
    }

    #[test]
    fn test_accidental_marks() {
        let a_minor = KeySignature::new(0);
        assert_eq!(a_minor.mark_for("G#".parse().unwrap()), AccidentalMark::Sharp);
        assert_eq!(a_minor.mark_for("G".parse().unwrap()), AccidentalMark::None);

        let ab_minor = KeySignature::new(-7);
        assert_eq!(ab_minor.mark_for("G".parse().unwrap()), AccidentalMark::Natural);
        assert_eq!(ab_minor.mark_for("Cb".parse().unwrap()), AccidentalMark::Flat);

        let a_sharp_minor = KeySignature::new(7);
        assert_eq!(
            a_sharp_minor.mark_for("G##".parse().unwrap()),
            AccidentalMark::DoubleSharp
        );
    }

    #[test]
    fn test_staff_notes_for_ab_harmonic_minor() {
        let scale = find("Ab Harmonic Minor").unwrap();
        let staff = staff_notes(scale, ScaleForm::Ascending, DEFAULT_START_OCTAVE);
        assert_eq!(staff.len(), 8);
        assert_eq!(staff[2].letter, Letter::C);
        assert_eq!(staff[2].written_octave, 5);
        assert_eq!(staff[6].mark, AccidentalMark::Natural);
    }

    #[test]
    fn test_highlight_matches_canonical_key() {
        let hl = Highlight::new(6, pitch("B#", 4));
        assert!(hl.lights_key(&KeyboardKey::from_midi(72)));
        assert!(!hl.lights_key(&KeyboardKey::from_midi(71)));
        assert!(hl.lights_slot(6));
    }
}
