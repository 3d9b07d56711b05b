// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback plans: which pitches play, in what order, and when.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::frequency::note_frequency;
use crate::music::{display_pitches, Pitch, Scale, ScaleForm};

/// Delay before the first note, in seconds
pub const LEAD_IN: f64 = 0.1;

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Root up to the octave root (8 notes)
    Ascending,
    /// Octave root down to the root (8 notes)
    Descending,
    /// Up then back down without repeating the top note (15 notes)
    UpAndDown,
}

impl PlaybackMode {
    /// Parse mode from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "ascending" => Some(PlaybackMode::Ascending),
            "down" | "descending" => Some(PlaybackMode::Descending),
            "updown" | "up-and-down" | "up_and_down" | "both" => Some(PlaybackMode::UpAndDown),
            _ => None,
        }
    }
}

impl fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackMode::Ascending => "ascending",
            PlaybackMode::Descending => "descending",
            PlaybackMode::UpAndDown => "up and down",
        };
        write!(f, "{}", name)
    }
}

/// Playback speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tempo {
    Slow,
    Medium,
    Fast,
}

impl Tempo {
    /// Seconds between note onsets
    pub fn interval(self) -> f64 {
        match self {
            Tempo::Slow => 0.6,
            Tempo::Medium => 0.45,
            Tempo::Fast => 0.3,
        }
    }

    /// Seconds each note sounds
    pub fn note_duration(self) -> f64 {
        match self {
            Tempo::Slow => 0.65,
            Tempo::Medium => 0.5,
            Tempo::Fast => 0.35,
        }
    }

    /// Parse tempo from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "slow" => Some(Tempo::Slow),
            "medium" => Some(Tempo::Medium),
            "fast" => Some(Tempo::Fast),
            _ => None,
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tempo::Slow => "slow",
            Tempo::Medium => "medium",
            Tempo::Fast => "fast",
        };
        write!(f, "{}", name)
    }
}

/// One note of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNote {
    /// Position in play order
    pub play_index: usize,
    /// Position in ascending display order (0-7)
    pub display_index: usize,
    /// Spelled note and engine octave
    pub pitch: Pitch,
    /// Frequency in Hz
    pub frequency: f64,
    /// Onset, in seconds from the start of playback
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
}

impl PlannedNote {
    /// Label such as "Ab4"
    pub fn label(&self) -> String {
        self.pitch.label()
    }
}

/// A fully timed playback of one scale
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackPlan {
    scale_name: String,
    mode: PlaybackMode,
    tempo: Tempo,
    notes: Vec<PlannedNote>,
    direction_change: Option<usize>,
}

impl PlaybackPlan {
    /// Build the plan for a scale.
    ///
    /// Each direction takes its octaves from the form it plays: the
    /// descending leg of a melodic minor uses `notes_descending`.
    pub fn build(scale: &Scale, mode: PlaybackMode, tempo: Tempo, start_octave: i32) -> Self {
        let ascending = || {
            display_pitches(scale, ScaleForm::Ascending, start_octave)
                .into_iter()
                .enumerate()
                .collect::<Vec<_>>()
        };
        // Descending form in play order, tagged with each pitch's display slot
        let descending = || {
            let pitches = display_pitches(scale, ScaleForm::Descending, start_octave);
            pitches.into_iter().enumerate().rev().collect::<Vec<_>>()
        };

        let (sequence, direction_change) = match mode {
            PlaybackMode::Ascending => (ascending(), None),
            PlaybackMode::Descending => (descending(), None),
            PlaybackMode::UpAndDown => {
                let mut sequence = ascending();
                let turn = sequence.len();
                sequence.extend(descending().into_iter().skip(1));
                (sequence, Some(turn))
            }
        };

        let interval = tempo.interval();
        let duration = tempo.note_duration();
        let notes = sequence
            .into_iter()
            .enumerate()
            .map(|(play_index, (display_index, pitch))| PlannedNote {
                play_index,
                display_index,
                pitch,
                frequency: note_frequency(pitch.note, pitch.octave),
                start: LEAD_IN + play_index as f64 * interval,
                duration,
            })
            .collect();

        Self {
            scale_name: scale.name().to_string(),
            mode,
            tempo,
            notes,
            direction_change,
        }
    }

    pub fn scale_name(&self) -> &str {
        &self.scale_name
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Notes in play order
    pub fn notes(&self) -> &[PlannedNote] {
        &self.notes
    }

    /// Play index where an up-and-down plan turns around
    pub fn direction_change(&self) -> Option<usize> {
        self.direction_change
    }

    /// Seconds from start until the last note has finished
    pub fn clear_time(&self) -> f64 {
        LEAD_IN + self.notes.len() as f64 * self.tempo.interval() + self.tempo.note_duration()
    }

    /// Note labels in play order
    pub fn labels(&self) -> Vec<String> {
        self.notes.iter().map(|n| n.label()).collect()
    }
}
