// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale playback.
//!
//! A `PlaybackPlan` fixes the pitches and timing for one scale, direction
//! and tempo. The `Player` schedules a plan on an audio sink and reports
//! progress as `PlaybackEvent`s.

pub mod frequency;
pub mod plan;
pub mod player;

pub use frequency::{frequency_for_name, note_frequency, A4_HZ};
pub use plan::{PlannedNote, PlaybackMode, PlaybackPlan, Tempo, LEAD_IN};
pub use player::{Playback, PlaybackEvent, Player};
