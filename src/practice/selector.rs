// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Daily scale selection.
//!
//! Each candidate is scored `(4 - confidence) * 20 + days_since + U[0, 5)`.
//! Higher scores are picked first. A picked scale also blocks its
//! enharmonic alt name, so the same keys are never practiced twice in one
//! day under different spellings.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use super::{PracticeEntry, PracticeHistory};
use crate::music::{all_scales, Scale, ScaleType};

/// Days assumed for a scale that has never been practiced
pub const NEVER_PRACTICED_DAYS: f64 = 999.0;

/// Upper bound (exclusive) of the random jitter added to each score
pub const JITTER: f64 = 5.0;

/// Score an entry; higher means more in need of practice
pub fn score_entry<R: Rng + ?Sized>(entry: &PracticeEntry, now: DateTime<Utc>, rng: &mut R) -> f64 {
    let confidence_weight = (4 - entry.confidence.level() as i32) as f64 * 20.0;
    confidence_weight + entry.days_since(now) + rng.gen_range(0.0..JITTER)
}

/// Pick up to `count` scales from `scales` for today's practice.
///
/// Only scales of an enabled type are considered. Ties keep the order of
/// `scales`. Returns fewer than `count` when there are not enough
/// candidates.
pub fn select_from<'a, R: Rng + ?Sized>(
    scales: &'a [Scale],
    history: &PracticeHistory,
    enabled: &[ScaleType],
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'a Scale> {
    let mut scored: Vec<(&Scale, f64)> = scales
        .iter()
        .filter(|s| enabled.contains(&s.scale_type()))
        .map(|s| (s, score_entry(&history.entry_or_default(s.name()), now, rng)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut picked = Vec::with_capacity(count);
    let mut blocked: HashSet<&str> = HashSet::new();
    for (scale, score) in scored {
        if picked.len() >= count {
            break;
        }
        if blocked.contains(scale.name())
            || scale.alt_name().is_some_and(|alt| blocked.contains(alt))
        {
            continue;
        }
        debug!("Selected {} (score {:.1})", scale.name(), score);
        blocked.insert(scale.name());
        if let Some(alt) = scale.alt_name() {
            blocked.insert(alt);
        }
        picked.push(scale);
    }
    picked
}

/// Pick today's scales from the full catalog
pub fn select_daily_scales<R: Rng + ?Sized>(
    history: &PracticeHistory,
    enabled: &[ScaleType],
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'static Scale> {
    select_from(all_scales(), history, enabled, count, now, rng)
}
