// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory for scale practice.
//!
//! This module provides the spelled scale catalog, enharmonic re-spelling,
//! octave assignment and the rendering model shared by keyboard and staff
//! views.

pub mod catalog;
pub mod enharmonic;
pub mod notation;
pub mod note;
pub mod octave;
pub mod scale;

pub use catalog::{all_scales, find, find_any};
pub use enharmonic::{enharmonic_equivalent, resolve, respell};
pub use notation::{
    display_pitches, staff_notes, AccidentalMark, Highlight, KeySignature, KeyboardKey, Pitch,
    StaffNote,
};
pub use note::{Accidental, Letter, Note, NoteParseError};
pub use octave::{assign_octaves, DEFAULT_START_OCTAVE};
pub use scale::{Scale, ScaleForm, ScaleIntegrityError, ScaleType};
