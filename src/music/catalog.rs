// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The fixed catalog of 48 practice scales.
//!
//! Twelve roots for each of the four scale types. Spellings are literal:
//! every scale uses each letter exactly once, so flat keys carry `Cb`/`Fb`
//! and sharp keys carry `E#`/`B#` where the theory requires them.

use once_cell::sync::Lazy;

use super::note::{Accidental, Letter, Note};
use super::scale::{Scale, ScaleType};

/// Short names for the spellings used by the catalog
mod n {
    use super::{Accidental, Letter, Note};

    pub const C: Note = Note::natural(Letter::C);
    pub const CS: Note = Note::new(Letter::C, Accidental::Sharp);
    pub const CB: Note = Note::new(Letter::C, Accidental::Flat);
    pub const D: Note = Note::natural(Letter::D);
    pub const DS: Note = Note::new(Letter::D, Accidental::Sharp);
    pub const DB: Note = Note::new(Letter::D, Accidental::Flat);
    pub const E: Note = Note::natural(Letter::E);
    pub const ES: Note = Note::new(Letter::E, Accidental::Sharp);
    pub const EB: Note = Note::new(Letter::E, Accidental::Flat);
    pub const F: Note = Note::natural(Letter::F);
    pub const FS: Note = Note::new(Letter::F, Accidental::Sharp);
    pub const FB: Note = Note::new(Letter::F, Accidental::Flat);
    pub const G: Note = Note::natural(Letter::G);
    pub const GS: Note = Note::new(Letter::G, Accidental::Sharp);
    pub const GB: Note = Note::new(Letter::G, Accidental::Flat);
    pub const A: Note = Note::natural(Letter::A);
    pub const AS: Note = Note::new(Letter::A, Accidental::Sharp);
    pub const AB: Note = Note::new(Letter::A, Accidental::Flat);
    pub const B: Note = Note::natural(Letter::B);
    pub const BS: Note = Note::new(Letter::B, Accidental::Sharp);
    pub const BB: Note = Note::new(Letter::B, Accidental::Flat);
}

use n::*;

/// Number of scales in the catalog
pub const CATALOG_SIZE: usize = 48;

static CATALOG: Lazy<Vec<Scale>> = Lazy::new(build_catalog);

/// All 48 scales in stable catalog order.
///
/// Order is majors, natural minors, harmonic minors, melodic minors; the
/// practice selector relies on it to break ties.
pub fn all_scales() -> &'static [Scale] {
    &CATALOG
}

/// Look up a scale by its canonical name
pub fn find(name: &str) -> Option<&'static Scale> {
    CATALOG.iter().find(|s| s.name() == name)
}

/// Look up a scale by canonical name or alternative name
pub fn find_any(name: &str) -> Option<&'static Scale> {
    CATALOG.iter().find(|s| s.answers_to(name))
}

/// Scales of one type, in catalog order
pub fn scales_of_type(scale_type: ScaleType) -> impl Iterator<Item = &'static Scale> {
    CATALOG.iter().filter(move |s| s.scale_type() == scale_type)
}

fn major(root: &str, notes: [Note; 7]) -> Scale {
    Scale::new(format!("{} Major", root), ScaleType::Major, notes.to_vec())
}

fn minor(root: &str, scale_type: ScaleType, notes: [Note; 7]) -> Scale {
    Scale::new(format!("{} {}", root, scale_type.name()), scale_type, notes.to_vec())
}

/// Alt names for minor roots with a sharp-key twin
fn minor_alt_root(root: &str) -> Option<&'static str> {
    match root {
        "Ab" => Some("G#"),
        "Eb" => Some("D#"),
        "Bb" => Some("A#"),
        _ => None,
    }
}

fn build_catalog() -> Vec<Scale> {
    let mut scales = Vec::with_capacity(CATALOG_SIZE);

    let majors: [(&str, [Note; 7], Option<&str>); 12] = [
        ("C", [C, D, E, F, G, A, B], None),
        ("G", [G, A, B, C, D, E, FS], None),
        ("D", [D, E, FS, G, A, B, CS], None),
        ("A", [A, B, CS, D, E, FS, GS], None),
        ("E", [E, FS, GS, A, B, CS, DS], None),
        ("B", [B, CS, DS, E, FS, GS, AS], Some("Cb Major")),
        ("F#", [FS, GS, AS, B, CS, DS, ES], Some("Gb Major")),
        ("C#", [CS, DS, ES, FS, GS, AS, BS], Some("Db Major")),
        ("F", [F, G, A, BB, C, D, E], None),
        ("Bb", [BB, C, D, EB, F, G, A], None),
        ("Eb", [EB, F, G, AB, BB, C, D], None),
        ("Ab", [AB, BB, C, DB, EB, F, G], None),
    ];
    for (root, notes, alt) in majors {
        let scale = major(root, notes);
        scales.push(match alt {
            Some(alt) => scale.with_alt_name(alt),
            None => scale,
        });
    }

    // (root, natural, harmonic, melodic ascending)
    let minors: [(&str, [Note; 7], [Note; 7], [Note; 7]); 12] = [
        (
            "A",
            [A, B, C, D, E, F, G],
            [A, B, C, D, E, F, GS],
            [A, B, C, D, E, FS, GS],
        ),
        (
            "E",
            [E, FS, G, A, B, C, D],
            [E, FS, G, A, B, C, DS],
            [E, FS, G, A, B, CS, DS],
        ),
        (
            "B",
            [B, CS, D, E, FS, G, A],
            [B, CS, D, E, FS, G, AS],
            [B, CS, D, E, FS, GS, AS],
        ),
        (
            "F#",
            [FS, GS, A, B, CS, D, E],
            [FS, GS, A, B, CS, D, ES],
            [FS, GS, A, B, CS, DS, ES],
        ),
        (
            "C#",
            [CS, DS, E, FS, GS, A, B],
            [CS, DS, E, FS, GS, A, BS],
            [CS, DS, E, FS, GS, AS, BS],
        ),
        (
            "Ab",
            [AB, BB, CB, DB, EB, FB, GB],
            [AB, BB, CB, DB, EB, FB, G],
            [AB, BB, CB, DB, EB, F, G],
        ),
        (
            "Eb",
            [EB, F, GB, AB, BB, CB, DB],
            [EB, F, GB, AB, BB, CB, D],
            [EB, F, GB, AB, BB, C, D],
        ),
        (
            "Bb",
            [BB, C, DB, EB, F, GB, AB],
            [BB, C, DB, EB, F, GB, A],
            [BB, C, DB, EB, F, G, A],
        ),
        (
            "D",
            [D, E, F, G, A, BB, C],
            [D, E, F, G, A, BB, CS],
            [D, E, F, G, A, B, CS],
        ),
        (
            "G",
            [G, A, BB, C, D, EB, F],
            [G, A, BB, C, D, EB, FS],
            [G, A, BB, C, D, E, FS],
        ),
        (
            "C",
            [C, D, EB, F, G, AB, BB],
            [C, D, EB, F, G, AB, B],
            [C, D, EB, F, G, A, B],
        ),
        (
            "F",
            [F, G, AB, BB, C, DB, EB],
            [F, G, AB, BB, C, DB, E],
            [F, G, AB, BB, C, D, E],
        ),
    ];

    for scale_type in [
        ScaleType::NaturalMinor,
        ScaleType::HarmonicMinor,
        ScaleType::MelodicMinor,
    ] {
        for (root, natural, harmonic, melodic) in &minors {
            let scale = match scale_type {
                ScaleType::HarmonicMinor => minor(root, scale_type, *harmonic),
                ScaleType::MelodicMinor => {
                    minor(root, scale_type, *melodic).with_descending(natural.to_vec())
                }
                _ => minor(root, scale_type, *natural),
            };
            scales.push(match minor_alt_root(root) {
                Some(alt) => scale.with_alt_name(format!("{} {}", alt, scale_type.name())),
                None => scale,
            });
        }
    }

    scales
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn spelled(scale: &Scale) -> Vec<String> {
        scale.notes().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_catalog_has_48_scales() {
        assert_eq!(all_scales().len(), CATALOG_SIZE);
        for scale_type in ScaleType::ALL {
            assert_eq!(scales_of_type(scale_type).count(), 12);
        }
    }

    #[test]
    fn test_every_scale_verifies() {
        for scale in all_scales() {
            assert_eq!(scale.verify(), Ok(()), "{}", scale.name());
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = all_scales().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), CATALOG_SIZE);
    }

    #[test]
    fn test_twelve_alt_names_none_colliding() {
        let names: HashSet<&str> = all_scales().iter().map(|s| s.name()).collect();
        let alts: Vec<&str> = all_scales().iter().filter_map(|s| s.alt_name()).collect();
        assert_eq!(alts.len(), 12);
        for alt in alts {
            assert!(!names.contains(alt), "{} collides with a canonical name", alt);
        }
    }

    #[test]
    fn test_only_melodic_minor_has_descending() {
        for scale in all_scales() {
            assert_eq!(
                scale.notes_descending().is_some(),
                scale.scale_type() == ScaleType::MelodicMinor,
                "{}",
                scale.name()
            );
        }
    }

    #[test]
    fn test_flat_minor_spellings() {
        let ab = find("Ab Natural Minor").unwrap();
        assert_eq!(spelled(ab), ["Ab", "Bb", "Cb", "Db", "Eb", "Fb", "Gb"]);
        assert_eq!(ab.alt_name(), Some("G# Natural Minor"));

        let ab_melodic = find("Ab Melodic Minor").unwrap();
        assert_eq!(spelled(ab_melodic), ["Ab", "Bb", "Cb", "Db", "Eb", "F", "G"]);
    }

    #[test]
    fn test_sharp_major_spellings() {
        let cs = find("C# Major").unwrap();
        assert_eq!(spelled(cs), ["C#", "D#", "E#", "F#", "G#", "A#", "B#"]);
        assert_eq!(cs.alt_name(), Some("Db Major"));
    }

    #[test]
    fn test_find_any_resolves_alt_names() {
        assert_eq!(find_any("Gb Major").map(|s| s.name()), Some("F# Major"));
        assert!(find("Gb Major").is_none());
        assert!(find("H Major").is_none());
    }

    #[test]
    fn test_catalog_order_is_stable() {
        assert_eq!(all_scales()[0].name(), "C Major");
        assert_eq!(all_scales()[12].name(), "A Natural Minor");
        assert_eq!(all_scales()[47].name(), "F Melodic Minor");
    }
}
