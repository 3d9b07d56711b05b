// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled note names.
//!
//! A note is a letter plus an accidental. Spelling is significant here:
//! `C#` and `Db` sound the same but are different notes, and scale
//! definitions depend on getting that difference right.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semitone offset type
pub type Semitones = i8;

/// Natural note letters, in ascending order within an octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in the C-D-E-F-G-A-B cycle
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position in the C-D-E-F-G-A-B cycle (0-6)
    pub fn position(self) -> usize {
        self as usize
    }

    /// Semitones above C for the natural letter
    pub fn semitone(self) -> Semitones {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Parse an uppercase or lowercase letter
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    /// Uppercase character for this letter
    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// The letter `steps` positions away, wrapping around the cycle
    pub fn offset(self, steps: i32) -> Self {
        let pos = (self.position() as i32 + steps).rem_euclid(7);
        Letter::ALL[pos as usize]
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Accidentals supported in scale spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    /// All accidentals from lowest to highest
    pub const ALL: [Accidental; 5] = [
        Accidental::DoubleFlat,
        Accidental::Flat,
        Accidental::Natural,
        Accidental::Sharp,
        Accidental::DoubleSharp,
    ];

    /// Semitone alteration applied to the natural letter
    pub fn semitones(self) -> Semitones {
        match self {
            Accidental::DoubleFlat => -2,
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
        }
    }

    /// Accidental for a semitone alteration, if one exists
    pub fn from_semitones(semitones: Semitones) -> Option<Self> {
        match semitones {
            -2 => Some(Accidental::DoubleFlat),
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            2 => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// Text suffix used in note names ("" for natural)
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }

    /// Parse a note-name suffix
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "bb" => Some(Accidental::DoubleFlat),
            "b" => Some(Accidental::Flat),
            "" => Some(Accidental::Natural),
            "#" => Some(Accidental::Sharp),
            "##" => Some(Accidental::DoubleSharp),
            _ => None,
        }
    }

    /// True for single and double flats
    pub fn is_flat(self) -> bool {
        matches!(self, Accidental::Flat | Accidental::DoubleFlat)
    }

    /// True for single and double sharps
    pub fn is_sharp(self) -> bool {
        matches!(self, Accidental::Sharp | Accidental::DoubleSharp)
    }
}

/// Errors produced when parsing a note name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    /// The input was empty
    #[error("empty note name")]
    Empty,
    /// The first character is not a letter A-G
    #[error("invalid note letter '{0}'")]
    InvalidLetter(char),
    /// The suffix is not one of "", "#", "##", "b", "bb"
    #[error("invalid accidental '{0}'")]
    InvalidAccidental(String),
}

/// A spelled note: letter plus accidental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    letter: Letter,
    accidental: Accidental,
}

impl Note {
    /// Create a note from letter and accidental
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    /// Create a natural note
    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    /// Get the letter
    pub fn letter(self) -> Letter {
        self.letter
    }

    /// Get the accidental
    pub fn accidental(self) -> Accidental {
        self.accidental
    }

    /// Pitch class (0-11), ignoring spelling
    pub fn pitch_class(self) -> u8 {
        (self.letter.semitone() + self.accidental.semitones()).rem_euclid(12) as u8
    }

    /// Semitones above the C of the octave number this note is filed under.
    ///
    /// Octave numbers follow the letter, with one exception: flats on C are
    /// filed with the B below them (`Cb4` sounds as B4), matching how the
    /// octave engine registers them. `B#4` therefore sounds as C5.
    pub fn register_offset(self) -> Semitones {
        let offset = self.letter.semitone() + self.accidental.semitones();
        if self.letter == Letter::C && self.accidental.is_flat() {
            offset + 12
        } else {
            offset
        }
    }

    /// True when both notes name the same pitch class
    pub fn is_enharmonic_with(self, other: Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }

    /// Every spelling this crate can represent (35 notes)
    pub fn all_spellings() -> impl Iterator<Item = Note> {
        Letter::ALL
            .into_iter()
            .flat_map(|l| Accidental::ALL.into_iter().map(move |a| Note::new(l, a)))
    }
}

impl FromStr for Note {
    type Err = NoteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next().ok_or(NoteParseError::Empty)?;
        let letter = Letter::from_char(first).ok_or(NoteParseError::InvalidLetter(first))?;
        let rest = chars.as_str();
        let accidental = Accidental::from_symbol(rest)
            .ok_or_else(|| NoteParseError::InvalidAccidental(rest.to_string()))?;
        Ok(Note::new(letter, accidental))
    }
}

impl TryFrom<String> for Note {
    type Error = NoteParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.to_string()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.accidental.symbol())
    }
}

/// Parse a list of note names, failing on the first bad one
pub fn parse_notes<S: AsRef<str>>(names: &[S]) -> Result<Vec<Note>, NoteParseError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naturals_and_accidentals() {
        assert_eq!("C".parse::<Note>(), Ok(Note::natural(Letter::C)));
        assert_eq!("F#".parse::<Note>(), Ok(Note::new(Letter::F, Accidental::Sharp)));
        assert_eq!("Bb".parse::<Note>(), Ok(Note::new(Letter::B, Accidental::Flat)));
        assert_eq!("G##".parse::<Note>(), Ok(Note::new(Letter::G, Accidental::DoubleSharp)));
        assert_eq!("Ebb".parse::<Note>(), Ok(Note::new(Letter::E, Accidental::DoubleFlat)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Note>(), Err(NoteParseError::Empty));
        assert_eq!("H".parse::<Note>(), Err(NoteParseError::InvalidLetter('H')));
        assert_eq!(
            "C###".parse::<Note>(),
            Err(NoteParseError::InvalidAccidental("###".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_spelling() {
        for note in Note::all_spellings() {
            let text = note.to_string();
            assert_eq!(text.parse::<Note>(), Ok(note));
        }
    }

    #[test]
    fn test_pitch_class() {
        let pc = |s: &str| s.parse::<Note>().map(|n| n.pitch_class());
        assert_eq!(pc("C"), Ok(0));
        assert_eq!(pc("B#"), Ok(0));
        assert_eq!(pc("Db"), Ok(1));
        assert_eq!(pc("B##"), Ok(1));
        assert_eq!(pc("Cb"), Ok(11));
        assert_eq!(pc("F##"), Ok(7));
        assert_eq!(pc("Fb"), Ok(4));
    }

    #[test]
    fn test_register_offset_files_c_flats_with_b() {
        let off = |s: &str| s.parse::<Note>().map(|n| n.register_offset());
        assert_eq!(off("Cb"), Ok(11));
        assert_eq!(off("Cbb"), Ok(10));
        assert_eq!(off("B#"), Ok(12));
        assert_eq!(off("Fb"), Ok(4));
        assert_eq!(off("E#"), Ok(5));
    }

    #[test]
    fn test_letter_offset_wraps() {
        assert_eq!(Letter::B.offset(1), Letter::C);
        assert_eq!(Letter::C.offset(-1), Letter::B);
        assert_eq!(Letter::A.offset(9), Letter::C);
    }

    #[test]
    fn test_serde_as_string() {
        let note: Note = "F##".parse().unwrap();
        let json = serde_json::to_string(&note).unwrap();
        assert_eq!(json, "\"F##\"");
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
        assert!(serde_json::from_str::<Note>("\"X\"").is_err());
    }

    #[test]
    fn test_all_spellings_count() {
        assert_eq!(Note::all_spellings().count(), 35);
    }
}
