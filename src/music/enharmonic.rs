// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Enharmonic re-spelling of catalog scales.
//!
//! Converting F# Major to Gb Major is not a per-note accidental swap: every
//! degree moves to the neighbouring letter, which can produce double
//! sharps (`A# Melodic Minor` has `F##` and `G##`). Each supported root pair
//! therefore has its own explicit spelling table, usable in both
//! directions. A narrower accidental swap covers anything the table lacks.

use tracing::{debug, warn};

use super::catalog;
use super::note::{Accidental, Letter, Note};
use super::scale::Scale;

const fn nt(letter: Letter, accidental: Accidental) -> Note {
    Note::new(letter, accidental)
}

use Accidental::{DoubleSharp as X, Flat as Fl, Natural as Na, Sharp as Sh};
use Letter::{A, B, C, D, E, F, G};

/// Spelling table for one enharmonic root pair, stored in the direction
/// from the catalog spelling to its alt-name spelling.
struct RootPair {
    from_root: Note,
    to_root: Note,
    notes: &'static [(Note, Note)],
}

const BB_AS: &[(Note, Note)] = &[
    (nt(B, Fl), nt(A, Sh)),
    (nt(C, Na), nt(B, Sh)),
    (nt(D, Fl), nt(C, Sh)),
    (nt(E, Fl), nt(D, Sh)),
    (nt(F, Na), nt(E, Sh)),
    (nt(G, Fl), nt(F, Sh)),
    (nt(A, Fl), nt(G, Sh)),
    (nt(A, Na), nt(G, X)),
    (nt(G, Na), nt(F, X)),
];

const EB_DS: &[(Note, Note)] = &[
    (nt(E, Fl), nt(D, Sh)),
    (nt(F, Na), nt(E, Sh)),
    (nt(G, Fl), nt(F, Sh)),
    (nt(A, Fl), nt(G, Sh)),
    (nt(B, Fl), nt(A, Sh)),
    (nt(C, Fl), nt(B, Na)),
    (nt(D, Fl), nt(C, Sh)),
    (nt(D, Na), nt(C, X)),
    (nt(C, Na), nt(B, Sh)),
];

const AB_GS: &[(Note, Note)] = &[
    (nt(A, Fl), nt(G, Sh)),
    (nt(B, Fl), nt(A, Sh)),
    (nt(C, Fl), nt(B, Na)),
    (nt(D, Fl), nt(C, Sh)),
    (nt(E, Fl), nt(D, Sh)),
    (nt(F, Fl), nt(E, Na)),
    (nt(G, Fl), nt(F, Sh)),
    (nt(G, Na), nt(F, X)),
    (nt(F, Na), nt(E, Sh)),
];

const B_CB: &[(Note, Note)] = &[
    (nt(B, Na), nt(C, Fl)),
    (nt(C, Sh), nt(D, Fl)),
    (nt(D, Sh), nt(E, Fl)),
    (nt(E, Na), nt(F, Fl)),
    (nt(F, Sh), nt(G, Fl)),
    (nt(G, Sh), nt(A, Fl)),
    (nt(A, Sh), nt(B, Fl)),
];

const FS_GB: &[(Note, Note)] = &[
    (nt(F, Sh), nt(G, Fl)),
    (nt(G, Sh), nt(A, Fl)),
    (nt(A, Sh), nt(B, Fl)),
    (nt(B, Na), nt(C, Fl)),
    (nt(C, Sh), nt(D, Fl)),
    (nt(D, Sh), nt(E, Fl)),
    (nt(E, Sh), nt(F, Na)),
];

const CS_DB: &[(Note, Note)] = &[
    (nt(C, Sh), nt(D, Fl)),
    (nt(D, Sh), nt(E, Fl)),
    (nt(E, Sh), nt(F, Na)),
    (nt(F, Sh), nt(G, Fl)),
    (nt(G, Sh), nt(A, Fl)),
    (nt(A, Sh), nt(B, Fl)),
    (nt(B, Sh), nt(C, Na)),
];

const ROOT_PAIRS: &[RootPair] = &[
    RootPair { from_root: nt(B, Fl), to_root: nt(A, Sh), notes: BB_AS },
    RootPair { from_root: nt(E, Fl), to_root: nt(D, Sh), notes: EB_DS },
    RootPair { from_root: nt(A, Fl), to_root: nt(G, Sh), notes: AB_GS },
    RootPair { from_root: nt(B, Na), to_root: nt(C, Fl), notes: B_CB },
    RootPair { from_root: nt(F, Sh), to_root: nt(G, Fl), notes: FS_GB },
    RootPair { from_root: nt(C, Sh), to_root: nt(D, Fl), notes: CS_DB },
];

/// Single-note accidental swaps used when a root-pair table has no entry
const SIMPLE_SWAPS: &[(Note, Note)] = &[
    (nt(D, Fl), nt(C, Sh)),
    (nt(E, Fl), nt(D, Sh)),
    (nt(G, Fl), nt(F, Sh)),
    (nt(A, Fl), nt(G, Sh)),
    (nt(B, Fl), nt(A, Sh)),
    (nt(C, Fl), nt(B, Na)),
    (nt(F, Fl), nt(E, Na)),
    (nt(E, Sh), nt(F, Na)),
    (nt(B, Sh), nt(C, Na)),
];

/// A direction through one of the root-pair tables
#[derive(Clone, Copy)]
struct Mapping {
    table: &'static [(Note, Note)],
    reversed: bool,
}

impl Mapping {
    fn for_roots(from: Note, to: Note) -> Option<Self> {
        ROOT_PAIRS.iter().find_map(|pair| {
            if pair.from_root == from && pair.to_root == to {
                Some(Mapping { table: pair.notes, reversed: false })
            } else if pair.from_root == to && pair.to_root == from {
                Some(Mapping { table: pair.notes, reversed: true })
            } else {
                None
            }
        })
    }

    fn lookup(self, note: Note) -> Option<Note> {
        self.table.iter().find_map(|&(a, b)| {
            let (src, dst) = if self.reversed { (b, a) } else { (a, b) };
            (src == note).then_some(dst)
        })
    }
}

/// Swap a single note to its common enharmonic spelling, if it has one
pub fn simple_swap(note: Note) -> Option<Note> {
    SIMPLE_SWAPS.iter().find_map(|&(a, b)| {
        if a == note {
            Some(b)
        } else if b == note {
            Some(a)
        } else {
            None
        }
    })
}

/// Re-spell notes from one root's key into its enharmonic twin's key
pub fn convert_notes(notes: &[Note], from_root: Note, to_root: Note) -> Vec<Note> {
    let mapping = Mapping::for_roots(from_root, to_root);
    notes
        .iter()
        .map(|&note| {
            if let Some(converted) = mapping.and_then(|m| m.lookup(note)) {
                return converted;
            }
            match simple_swap(note) {
                Some(swapped) => {
                    warn!(
                        "No {}->{} spelling for {}, using simple swap {}",
                        from_root, to_root, note, swapped
                    );
                    swapped
                }
                None => {
                    warn!("No enharmonic spelling for {}, keeping it", note);
                    note
                }
            }
        })
        .collect()
}

/// Root note named at the start of a scale name ("Gb Major" -> Gb)
fn root_of(name: &str) -> Option<Note> {
    name.split_whitespace().next()?.parse().ok()
}

/// Convert a scale carrying an alt name into that alternative spelling.
///
/// The result has `name` and `alt_name` swapped, so converting the result
/// again returns the original spelling.
pub fn respell(scale: &Scale) -> Option<Scale> {
    let alt_name = scale.alt_name()?;
    let from_root = scale.root()?;
    let to_root = root_of(alt_name)?;

    let notes = convert_notes(scale.notes(), from_root, to_root);
    let notes_descending = scale
        .notes_descending()
        .map(|desc| convert_notes(desc, from_root, to_root));

    debug!("Respelled {} as {}", scale.name(), alt_name);
    Some(scale.respelled(
        alt_name.to_string(),
        Some(scale.name().to_string()),
        notes,
        notes_descending,
    ))
}

/// Build the scale named by a catalog alt name, e.g. "Gb Major".
///
/// Returns `None` when no catalog scale carries that alt name.
pub fn enharmonic_equivalent(alt_name: &str) -> Option<Scale> {
    let source = catalog::all_scales()
        .iter()
        .find(|s| s.alt_name() == Some(alt_name))?;
    respell(source)
}

/// Resolve any scale name, building the enharmonic spelling when needed
pub fn resolve(name: &str) -> Option<Scale> {
    match catalog::find(name) {
        Some(scale) => Some(scale.clone()),
        None => enharmonic_equivalent(name),
    }
}
