// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale definitions and their music-theory invariants.
//!
//! A scale here is a literal spelling, not a root plus interval formula:
//! the notes are stored exactly as they should be written, and the
//! interval structure is checked against that spelling.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::note::{Letter, Note};

/// Number of notes in every catalog scale
pub const SCALE_LENGTH: usize = 7;

/// Scale types in the practice catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleType {
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
}

impl ScaleType {
    /// All scale types in catalog order
    pub const ALL: [ScaleType; 4] = [
        ScaleType::Major,
        ScaleType::NaturalMinor,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
    ];

    /// Semitone steps between consecutive ascending degrees (root to 7th)
    pub fn step_pattern(self) -> [u8; 6] {
        match self {
            ScaleType::Major => [2, 2, 1, 2, 2, 2],
            ScaleType::NaturalMinor => [2, 1, 2, 2, 1, 2],
            ScaleType::HarmonicMinor => [2, 1, 2, 2, 1, 3],
            ScaleType::MelodicMinor => [2, 1, 2, 2, 2, 2],
        }
    }

    /// Step pattern of the descending form (natural minor for melodic minor)
    pub fn descending_step_pattern(self) -> [u8; 6] {
        match self {
            ScaleType::MelodicMinor => ScaleType::NaturalMinor.step_pattern(),
            other => other.step_pattern(),
        }
    }

    /// True for the three minor variants
    pub fn is_minor(self) -> bool {
        !matches!(self, ScaleType::Major)
    }

    /// Parse scale type from string
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "major" => Some(ScaleType::Major),
            "minor" | "naturalminor" => Some(ScaleType::NaturalMinor),
            "harmonicminor" => Some(ScaleType::HarmonicMinor),
            "melodicminor" => Some(ScaleType::MelodicMinor),
            _ => None,
        }
    }

    /// Human-readable name, as used in scale names
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::MelodicMinor => "Melodic Minor",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which spelling of a scale to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleForm {
    /// The `notes` spelling
    Ascending,
    /// `notes_descending` when present, otherwise `notes`
    Descending,
}

/// Violations of the catalog's music-theory invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleIntegrityError {
    #[error("{scale}: expected {SCALE_LENGTH} notes, found {found}")]
    WrongLength { scale: String, found: usize },
    #[error("{scale}: letters must each appear once, found {letters}")]
    RepeatedLetter { scale: String, letters: String },
    #[error("{scale}: steps {found:?} do not match {expected:?}")]
    WrongSteps {
        scale: String,
        expected: [u8; 6],
        found: Vec<u8>,
    },
    #[error("{scale}: descending notes present on a non-melodic scale")]
    UnexpectedDescending { scale: String },
    #[error("{scale}: melodic minor without descending notes")]
    MissingDescending { scale: String },
    #[error("{scale}: descending root {found} differs from {expected}")]
    DescendingRootMismatch {
        scale: String,
        expected: Note,
        found: Note,
    },
}

/// A spelled scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    name: String,
    #[serde(rename = "type")]
    scale_type: ScaleType,
    notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes_descending: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alt_name: Option<String>,
}

impl Scale {
    /// Create a scale from its spelling
    pub fn new(name: impl Into<String>, scale_type: ScaleType, notes: Vec<Note>) -> Self {
        Self {
            name: name.into(),
            scale_type,
            notes,
            notes_descending: None,
            alt_name: None,
        }
    }

    /// Attach a descending spelling (melodic minor)
    pub fn with_descending(mut self, notes: Vec<Note>) -> Self {
        self.notes_descending = Some(notes);
        self
    }

    /// Attach an alternative enharmonic name
    pub fn with_alt_name(mut self, alt_name: impl Into<String>) -> Self {
        self.alt_name = Some(alt_name.into());
        self
    }

    /// Canonical display name, e.g. "F# Harmonic Minor"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the scale type
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Ascending spelling, root first
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Descending spelling in ascending letter order, if distinct
    pub fn notes_descending(&self) -> Option<&[Note]> {
        self.notes_descending.as_deref()
    }

    /// Alternative enharmonic name, if any
    pub fn alt_name(&self) -> Option<&str> {
        self.alt_name.as_deref()
    }

    /// Root note (first degree)
    pub fn root(&self) -> Option<Note> {
        self.notes.first().copied()
    }

    /// Notes for the requested form
    pub fn form(&self, form: ScaleForm) -> &[Note] {
        match form {
            ScaleForm::Ascending => &self.notes,
            ScaleForm::Descending => self.notes_descending().unwrap_or(&self.notes),
        }
    }

    /// Notes of a form with the root repeated an octave up (8 notes)
    pub fn with_octave_root(&self, form: ScaleForm) -> Vec<Note> {
        let notes = self.form(form);
        let mut out = notes.to_vec();
        if let Some(&root) = notes.first() {
            out.push(root);
        }
        out
    }

    /// Whether `other` names this scale or its enharmonic alias
    pub fn answers_to(&self, other: &str) -> bool {
        self.name == other || self.alt_name.as_deref() == Some(other)
    }

    /// Check the spelling and interval invariants
    pub fn verify(&self) -> Result<(), ScaleIntegrityError> {
        check_spelling(&self.name, &self.notes, self.scale_type.step_pattern())?;

        match (&self.notes_descending, self.scale_type) {
            (Some(desc), ScaleType::MelodicMinor) => {
                check_spelling(&self.name, desc, self.scale_type.descending_step_pattern())?;
                if desc.first() != self.notes.first() {
                    return Err(ScaleIntegrityError::DescendingRootMismatch {
                        scale: self.name.clone(),
                        expected: self.notes[0],
                        found: desc[0],
                    });
                }
                Ok(())
            }
            (None, ScaleType::MelodicMinor) => Err(ScaleIntegrityError::MissingDescending {
                scale: self.name.clone(),
            }),
            (Some(_), _) => Err(ScaleIntegrityError::UnexpectedDescending {
                scale: self.name.clone(),
            }),
            (None, _) => Ok(()),
        }
    }

    /// Build a new scale with the given name, alt name and spellings.
    ///
    /// Used by the enharmonic converter; catalog entries are never mutated.
    pub(crate) fn respelled(
        &self,
        name: String,
        alt_name: Option<String>,
        notes: Vec<Note>,
        notes_descending: Option<Vec<Note>>,
    ) -> Self {
        Self {
            name,
            scale_type: self.scale_type,
            notes,
            notes_descending,
            alt_name,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Semitone distance between consecutive notes, always ascending (0-11)
pub fn step_intervals(notes: &[Note]) -> Vec<u8> {
    notes
        .windows(2)
        .map(|w| (w[1].pitch_class() as i16 - w[0].pitch_class() as i16).rem_euclid(12) as u8)
        .collect()
}

/// True when each of the seven letters appears exactly once
pub fn uses_each_letter_once(notes: &[Note]) -> bool {
    let letters: HashSet<Letter> = notes.iter().map(|n| n.letter()).collect();
    notes.len() == SCALE_LENGTH && letters.len() == SCALE_LENGTH
}

fn check_spelling(
    scale: &str,
    notes: &[Note],
    expected: [u8; 6],
) -> Result<(), ScaleIntegrityError> {
    if notes.len() != SCALE_LENGTH {
        return Err(ScaleIntegrityError::WrongLength {
            scale: scale.to_string(),
            found: notes.len(),
        });
    }
    if !uses_each_letter_once(notes) {
        let letters: String = notes.iter().map(|n| n.letter().as_char()).collect();
        return Err(ScaleIntegrityError::RepeatedLetter {
            scale: scale.to_string(),
            letters,
        });
    }
    let found = step_intervals(notes);
    if found != expected {
        return Err(ScaleIntegrityError::WrongSteps {
            scale: scale.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}
