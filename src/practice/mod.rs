// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Practice history and daily scale selection.
//!
//! History is keyed by scale name and serializes to the same JSON shape
//! as the stored practice document, `{"C Major": {"lastPracticed": ...,
//! "confidence": 2}}`.

pub mod selector;
pub mod session;

pub use selector::{score_entry, select_daily_scales, select_from, NEVER_PRACTICED_DAYS};
pub use session::PracticeSession;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Self-rated confidence after practicing a scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Confidence {
    NeedsWork = 1,
    GettingThere = 2,
    Mastered = 3,
}

/// Confidence outside 1-3
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("confidence must be 1, 2 or 3, got {0}")]
pub struct InvalidConfidence(pub u8);

impl Confidence {
    /// Numeric level (1-3)
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Confidence::NeedsWork => "Needs Work",
            Confidence::GettingThere => "Getting There",
            Confidence::Mastered => "Mastered",
        }
    }
}

impl TryFrom<u8> for Confidence {
    type Error = InvalidConfidence;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Confidence::NeedsWork),
            2 => Ok(Confidence::GettingThere),
            3 => Ok(Confidence::Mastered),
            other => Err(InvalidConfidence(other)),
        }
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> Self {
        c.level()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Practice record for one scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeEntry {
    /// ISO-8601 timestamp of the last practice, if any
    #[serde(default)]
    pub last_practiced: Option<String>,
    pub confidence: Confidence,
}

impl Default for PracticeEntry {
    /// The entry assumed for a scale with no history
    fn default() -> Self {
        Self {
            last_practiced: None,
            confidence: Confidence::NeedsWork,
        }
    }
}

impl PracticeEntry {
    /// Entry for a scale practiced at `now`
    pub fn practiced(now: DateTime<Utc>, confidence: Confidence) -> Self {
        Self {
            last_practiced: Some(format_timestamp(now)),
            confidence,
        }
    }

    /// Parsed last-practice time; `None` when absent or unparseable
    pub fn last_practiced_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_practiced.as_deref()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unparseable practice timestamp {:?}: {}", raw, e);
                None
            }
        }
    }

    /// Fractional days since the last practice.
    ///
    /// Never-practiced (or unreadable) entries count as
    /// `NEVER_PRACTICED_DAYS`; timestamps in the future count as zero.
    pub fn days_since(&self, now: DateTime<Utc>) -> f64 {
        match self.last_practiced_at() {
            Some(t) => {
                let millis = (now - t).num_milliseconds() as f64;
                (millis / 86_400_000.0).max(0.0)
            }
            None => NEVER_PRACTICED_DAYS,
        }
    }
}

/// Timestamp in the stored format, e.g. "2026-03-01T09:30:00.000Z"
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Practice records keyed by scale name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PracticeHistory {
    entries: BTreeMap<String, PracticeEntry>,
}

impl PracticeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored entry, if any
    pub fn get(&self, scale_name: &str) -> Option<&PracticeEntry> {
        self.entries.get(scale_name)
    }

    /// Stored entry, or the never-practiced default
    pub fn entry_or_default(&self, scale_name: &str) -> PracticeEntry {
        self.get(scale_name).cloned().unwrap_or_default()
    }

    /// Record a practice at `now`, replacing any previous entry
    pub fn record(&mut self, scale_name: &str, confidence: Confidence, now: DateTime<Utc>) {
        self.entries.insert(
            scale_name.to_string(),
            PracticeEntry::practiced(now, confidence),
        );
    }

    /// Insert an entry as-is
    pub fn insert(&mut self, scale_name: impl Into<String>, entry: PracticeEntry) {
        self.entries.insert(scale_name.into(), entry);
    }

    pub fn remove(&mut self, scale_name: &str) -> Option<PracticeEntry> {
        self.entries.remove(scale_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PracticeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scales at each confidence level
    pub fn confidence_counts(&self) -> BTreeMap<Confidence, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.confidence).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_confidence_serde_as_number() {
        assert_eq!(serde_json::to_string(&Confidence::GettingThere).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Confidence>("3").unwrap(), Confidence::Mastered);
        assert!(serde_json::from_str::<Confidence>("4").is_err());
        assert!(serde_json::from_str::<Confidence>("0").is_err());
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = PracticeEntry::practiced(at(1), Confidence::GettingThere);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"lastPracticed":"2026-03-01T09:30:00.000Z","confidence":2}"#
        );

        let never: PracticeEntry =
            serde_json::from_str(r#"{"lastPracticed":null,"confidence":1}"#).unwrap();
        assert_eq!(never, PracticeEntry::default());
    }

    #[test]
    fn test_days_since() {
        let entry = PracticeEntry::practiced(at(1), Confidence::NeedsWork);
        assert!((entry.days_since(at(3)) - 2.0).abs() < 1e-9);
        assert!((entry.days_since(at(1) + Duration::hours(12)) - 0.5).abs() < 1e-9);
        assert_eq!(PracticeEntry::default().days_since(at(3)), NEVER_PRACTICED_DAYS);
    }

    #[test]
    fn test_days_since_future_and_garbage() {
        let future = PracticeEntry::practiced(at(10), Confidence::Mastered);
        assert_eq!(future.days_since(at(1)), 0.0);

        let garbage = PracticeEntry {
            last_practiced: Some("last tuesday".to_string()),
            confidence: Confidence::Mastered,
        };
        assert_eq!(garbage.days_since(at(1)), NEVER_PRACTICED_DAYS);
    }

    #[test]
    fn test_history_round_trips_json() {
        let mut history = PracticeHistory::new();
        history.record("C Major", Confidence::Mastered, at(2));
        history.record("A Natural Minor", Confidence::NeedsWork, at(3));

        let json = serde_json::to_string(&history).unwrap();
        let back: PracticeHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history);
        assert!(json.starts_with(r#"{"A Natural Minor":"#));
    }

    #[test]
    fn test_entry_or_default_and_counts() {
        let mut history = PracticeHistory::new();
        assert_eq!(history.entry_or_default("C Major").confidence, Confidence::NeedsWork);

        history.record("C Major", Confidence::Mastered, at(1));
        history.record("G Major", Confidence::Mastered, at(1));
        history.record("D Major", Confidence::GettingThere, at(1));
        let counts = history.confidence_counts();
        assert_eq!(counts.get(&Confidence::Mastered), Some(&2));
        assert_eq!(counts.get(&Confidence::NeedsWork), None);
        assert_eq!(history.len(), 3);
    }
}
