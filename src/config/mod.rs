// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Practice settings.
//!
//! Settings load from YAML or TOML, chosen by file extension. Every field
//! has a default, so a partial file (or none at all) is valid.

pub mod watcher;

pub use watcher::{SettingsEvent, SettingsWatcher};

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::audio::AudioConfig;
use crate::music::{ScaleType, DEFAULT_START_OCTAVE};
use crate::playback::{PlaybackMode, Tempo};

/// Which scale types are offered for practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledScaleTypes {
    #[serde(default = "default_true")]
    pub major: bool,
    #[serde(default = "default_true")]
    pub natural_minor: bool,
    #[serde(default = "default_true")]
    pub harmonic_minor: bool,
    #[serde(default = "default_true")]
    pub melodic_minor: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnabledScaleTypes {
    fn default() -> Self {
        Self {
            major: true,
            natural_minor: true,
            harmonic_minor: true,
            melodic_minor: true,
        }
    }
}

impl EnabledScaleTypes {
    /// Only the given types enabled
    pub fn only(types: &[ScaleType]) -> Self {
        let mut enabled = Self {
            major: false,
            natural_minor: false,
            harmonic_minor: false,
            melodic_minor: false,
        };
        for &t in types {
            enabled.set(t, true);
        }
        enabled
    }

    pub fn is_enabled(&self, scale_type: ScaleType) -> bool {
        match scale_type {
            ScaleType::Major => self.major,
            ScaleType::NaturalMinor => self.natural_minor,
            ScaleType::HarmonicMinor => self.harmonic_minor,
            ScaleType::MelodicMinor => self.melodic_minor,
        }
    }

    pub fn set(&mut self, scale_type: ScaleType, enabled: bool) {
        match scale_type {
            ScaleType::Major => self.major = enabled,
            ScaleType::NaturalMinor => self.natural_minor = enabled,
            ScaleType::HarmonicMinor => self.harmonic_minor = enabled,
            ScaleType::MelodicMinor => self.melodic_minor = enabled,
        }
    }

    /// Enabled types in catalog order
    pub fn enabled(&self) -> Vec<ScaleType> {
        ScaleType::ALL
            .into_iter()
            .filter(|&t| self.is_enabled(t))
            .collect()
    }
}

/// User settings for practice and playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Playback speed
    #[serde(default = "default_tempo")]
    pub tempo: Tempo,
    /// Playback direction
    #[serde(default = "default_playback_mode")]
    pub playback_mode: PlaybackMode,
    /// Scales selected per day
    #[serde(default = "default_daily_scale_count")]
    pub daily_scale_count: usize,
    /// Octave of the first note
    #[serde(default = "default_start_octave")]
    pub start_octave: i32,
    /// Scale types the daily selection draws from
    #[serde(default)]
    pub enabled_scale_types: EnabledScaleTypes,
    /// Audio output
    #[serde(default)]
    pub audio: AudioConfig,
}

fn default_tempo() -> Tempo {
    Tempo::Medium
}
fn default_playback_mode() -> PlaybackMode {
    PlaybackMode::UpAndDown
}
fn default_daily_scale_count() -> usize {
    2
}
fn default_start_octave() -> i32 {
    DEFAULT_START_OCTAVE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_scale_types: EnabledScaleTypes::default(),
            tempo: default_tempo(),
            playback_mode: default_playback_mode(),
            daily_scale_count: default_daily_scale_count(),
            start_octave: default_start_octave(),
            audio: AudioConfig::default(),
        }
    }
}

/// On-disk settings formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Yaml,
    Toml,
}

impl SettingsFormat {
    /// Format for a path's extension; YAML unless it ends in `.toml`
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => SettingsFormat::Toml,
            _ => SettingsFormat::Yaml,
        }
    }
}

impl Settings {
    /// Load settings from a YAML or TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        let settings = match SettingsFormat::for_path(path) {
            SettingsFormat::Yaml => Self::from_yaml(&contents)?,
            SettingsFormat::Toml => Self::from_toml(&contents)?,
        };
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        Ok(settings)
    }

    /// Load settings, or defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML settings")
    }

    /// Parse settings from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML settings")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize settings to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings to TOML")
    }

    /// Save settings, formatted by the path's extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = match SettingsFormat::for_path(path) {
            SettingsFormat::Yaml => self.to_yaml()?,
            SettingsFormat::Toml => self.to_toml()?,
        };
        fs::write(path, text).with_context(|| format!("Failed to write settings file: {:?}", path))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.daily_scale_count == 0 {
            bail!("daily_scale_count must be at least 1");
        }
        if !(0..=8).contains(&self.start_octave) {
            bail!("start_octave {} is outside 0-8", self.start_octave);
        }
        self.audio.validate().map_err(|e| anyhow!(e))?;
        if self.enabled_scale_types.enabled().is_empty() {
            warn!("No scale types enabled; daily practice will be empty");
        }
        Ok(())
    }
}
