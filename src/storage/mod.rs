// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Persistence for practice history, the daily session and settings.
//!
//! Data lives in a string key-value store, one JSON document per key.
//! Unreadable documents are treated as empty so a corrupt store never
//! blocks practice.

pub mod file;

pub use file::FileStore;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;
use crate::practice::{format_timestamp, Confidence, PracticeHistory, PracticeSession};

/// Key for the practice history document
pub const PRACTICE_DATA_KEY: &str = "pianoPracticeData";
/// Key for today's selected scales
pub const DAILY_PRACTICE_KEY: &str = "dailyPianoPractice";
/// Key for user settings
pub const SETTINGS_KEY: &str = "pianoPracticeSettings";
/// Export format version written and accepted
pub const EXPORT_VERSION: u32 = 1;

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported export version {0}, expected {EXPORT_VERSION}")]
    UnsupportedVersion(u32),
}

/// A string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Stored daily selection, valid only on its date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPractice {
    /// Day of selection, "YYYY-MM-DD"
    pub date: String,
    /// Selected scale names
    pub scales: Vec<String>,
}

impl DailyPractice {
    pub fn new(date: NaiveDate, scales: Vec<String>) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            scales,
        }
    }

    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today.format("%Y-%m-%d").to_string()
    }
}

/// Full backup of stored data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub exported_at: String,
    pub practice_data: PracticeHistory,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_practice: Option<DailyPractice>,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and check the version
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.version != EXPORT_VERSION {
            return Err(StorageError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }
}

/// Typed access to practice data in a key-value store
pub struct PracticeRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PracticeRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding unreadable {}: {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, json)
    }

    /// Stored history, empty when missing or unreadable
    pub fn history(&self) -> PracticeHistory {
        self.read(PRACTICE_DATA_KEY).unwrap_or_default()
    }

    pub fn save_history(&mut self, history: &PracticeHistory) -> Result<(), StorageError> {
        self.write(PRACTICE_DATA_KEY, history)
    }

    /// Record a practice and return the updated history
    pub fn update_entry(
        &mut self,
        scale_name: &str,
        confidence: Confidence,
        now: DateTime<Utc>,
    ) -> Result<PracticeHistory, StorageError> {
        let mut history = self.history();
        history.record(scale_name, confidence, now);
        self.save_history(&history)?;
        Ok(history)
    }

    /// Today's stored scale names, if a selection was made today
    pub fn daily_practice(&self, today: NaiveDate) -> Option<Vec<String>> {
        self.read::<DailyPractice>(DAILY_PRACTICE_KEY)
            .filter(|d| d.is_for(today))
            .map(|d| d.scales)
    }

    pub fn save_daily_practice(
        &mut self,
        today: NaiveDate,
        scales: &[String],
    ) -> Result<(), StorageError> {
        self.write(DAILY_PRACTICE_KEY, &DailyPractice::new(today, scales.to_vec()))
    }

    pub fn clear_daily_practice(&mut self) -> Result<(), StorageError> {
        self.store.remove(DAILY_PRACTICE_KEY)
    }

    /// Today's session, if one was selected today
    pub fn session(&self, today: NaiveDate) -> Option<PracticeSession> {
        self.daily_practice(today)
            .map(|scales| PracticeSession::new(today, scales))
    }

    pub fn save_session(&mut self, session: &PracticeSession) -> Result<(), StorageError> {
        self.save_daily_practice(session.date(), session.scales())
    }

    /// Record feedback for the session's current scale and persist it.
    ///
    /// Once the last scale is recorded today's selection is cleared, so the
    /// next session of the day selects afresh instead of replaying it.
    pub fn record_feedback(
        &mut self,
        session: &mut PracticeSession,
        confidence: Confidence,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, StorageError> {
        let mut history = self.history();
        let Some(name) = session.record_feedback(confidence, now, &mut history) else {
            return Ok(None);
        };
        self.save_history(&history)?;
        if session.is_complete() {
            self.clear_daily_practice()?;
        }
        Ok(Some(name))
    }

    /// Stored settings, defaults when missing or unreadable
    pub fn settings(&self) -> Settings {
        self.read(SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write(SETTINGS_KEY, settings)
    }

    /// Forget history and today's selection; settings are kept
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.store.remove(PRACTICE_DATA_KEY)?;
        self.store.remove(DAILY_PRACTICE_KEY)?;
        info!("Cleared practice data");
        Ok(())
    }

    /// Snapshot everything for backup
    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            version: EXPORT_VERSION,
            exported_at: format_timestamp(now),
            practice_data: self.history(),
            settings: self.settings(),
            daily_practice: self.read(DAILY_PRACTICE_KEY),
        }
    }

    /// Replace stored data with a backup.
    ///
    /// A daily selection from another day is dropped, and any stored
    /// selection is cleared with it.
    pub fn import(&mut self, doc: &ExportDocument, today: NaiveDate) -> Result<(), StorageError> {
        if doc.version != EXPORT_VERSION {
            return Err(StorageError::UnsupportedVersion(doc.version));
        }
        self.save_history(&doc.practice_data)?;
        self.save_settings(&doc.settings)?;
        match &doc.daily_practice {
            Some(daily) if daily.is_for(today) => self.write(DAILY_PRACTICE_KEY, daily)?,
            _ => self.clear_daily_practice()?,
        }
        info!(
            "Imported {} practice entries exported at {}",
            doc.practice_data.len(),
            doc.exported_at
        );
        Ok(())
    }
}
