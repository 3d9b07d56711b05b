// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A day's practice: the selected scales and progress through them.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use tracing::info;

use super::{select_daily_scales, Confidence, PracticeHistory};
use crate::music::{enharmonic, Scale, ScaleType};

/// Today's scales and how far through them the learner is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    date: NaiveDate,
    scales: Vec<String>,
    current: usize,
}

impl PracticeSession {
    /// Resume a session from stored scale names
    pub fn new(date: NaiveDate, scales: Vec<String>) -> Self {
        Self {
            date,
            scales,
            current: 0,
        }
    }

    /// Select a fresh set of scales for the day of `now`
    pub fn start<R: Rng + ?Sized>(
        history: &PracticeHistory,
        enabled: &[ScaleType],
        count: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let scales: Vec<String> = select_daily_scales(history, enabled, count, now, rng)
            .into_iter()
            .map(|s| s.name().to_string())
            .collect();
        info!("Today's scales: {}", scales.join(", "));
        Self::new(now.date_naive(), scales)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Scale names in practice order
    pub fn scales(&self) -> &[String] {
        &self.scales
    }

    /// Index of the scale being practiced
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Name of the scale being practiced, `None` once complete
    pub fn current_scale(&self) -> Option<&str> {
        self.scales.get(self.current).map(String::as_str)
    }

    /// The scale being practiced, resolved through the catalog
    pub fn current(&self) -> Option<Scale> {
        self.current_scale().and_then(enharmonic::resolve)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.scales.len()
    }

    /// Whether the session was selected on `today`
    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    /// Record feedback for the current scale and move to the next one.
    ///
    /// Returns the name of the scale that was recorded, or `None` when the
    /// session is already complete.
    pub fn record_feedback(
        &mut self,
        confidence: Confidence,
        now: DateTime<Utc>,
        history: &mut PracticeHistory,
    ) -> Option<String> {
        let name = self.current_scale()?.to_string();
        history.record(&name, confidence, now);
        self.current += 1;
        info!("Recorded {} as {}", name, confidence);
        if self.is_complete() {
            info!("Daily practice complete");
        }
        Some(name)
    }
}
