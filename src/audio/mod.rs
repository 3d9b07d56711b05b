// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio output for scale playback.
//!
//! This module provides:
//! - The `AudioSink` seam the player schedules voices on
//! - A triangle-wave voice bank with the practice envelope
//! - Audio output via cpal, opened lazily on first use
//! - A capture sink for headless runs and tests

pub mod capture;
pub mod output;
pub mod synth;

pub use capture::CaptureSink;
pub use output::{AudioConfig, SynthOutput};
pub use synth::{Envelope, VoiceBank};

use thiserror::Error;

/// Generation tag shared by every voice of one playback
pub type Generation = u64;

/// One note to be sounded by a sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    /// Frequency in Hz
    pub frequency: f64,
    /// Start time on the sink's clock, in seconds
    pub start: f64,
    /// Note length in seconds, release included
    pub duration: f64,
    /// Playback this voice belongs to
    pub generation: Generation,
}

impl VoiceSpec {
    /// Time the voice has fully released
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A shared audio resource the player schedules notes on.
///
/// Implementations are created once and handed to the player. Opening the
/// underlying device is deferred to `ensure_ready`, which may be called any
/// number of times.
pub trait AudioSink: Send + Sync {
    /// Open the device if it is not open yet
    fn ensure_ready(&self) -> Result<(), AudioError>;

    /// Whether `ensure_ready` has succeeded and `dispose` has not been called
    fn is_ready(&self) -> bool;

    /// Current time on the sink's clock, in seconds
    fn now(&self) -> f64;

    /// Queue a voice
    fn schedule(&self, voice: VoiceSpec) -> Result<(), AudioError>;

    /// Silence every pending or sounding voice of a generation
    fn cancel_generation(&self, generation: Generation);

    /// Release the device. A later `ensure_ready` opens it again.
    fn dispose(&self);
}

/// Audio error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// Failed to initialize audio
    #[error("audio initialization failed: {0}")]
    InitFailed(String),
    /// Failed to start audio stream
    #[error("audio stream failed: {0}")]
    StreamFailed(String),
    /// Failed to acquire lock
    #[error("failed to acquire audio lock")]
    LockFailed,
    /// No audio device available
    #[error("no audio device available")]
    NoDevice,
    /// Voice scheduled before the sink was ready
    #[error("audio output is not ready")]
    NotReady,
    /// Playback started outside a tokio runtime
    #[error("no async runtime to deliver playback events")]
    NoRuntime,
    /// Invalid configuration
    #[error("invalid audio configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_end() {
        let voice = VoiceSpec {
            frequency: 440.0,
            start: 0.1,
            duration: 0.5,
            generation: 1,
        };
        assert!((voice.end() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AudioError::NoDevice.to_string(), "no audio device available");
        assert_eq!(
            AudioError::InitFailed("boom".into()).to_string(),
            "audio initialization failed: boom"
        );
    }
}
