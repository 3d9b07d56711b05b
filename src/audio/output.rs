// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio output via cpal.
//!
//! The stream is opened on first `ensure_ready` and lives on its own
//! thread, since cpal streams cannot move between threads on every
//! platform. The voice bank is shared with the stream callback.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::synth::VoiceBank;
use super::{AudioError, AudioSink, Generation, VoiceSpec};

/// Audio output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Buffer size in frames
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u32,
    /// Number of output channels
    #[serde(default = "default_channels")]
    pub channels: u16,
    /// Master volume (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_buffer_size() -> u32 {
    512
}

fn default_channels() -> u16 {
    2
}

fn default_volume() -> f32 {
    0.8
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            channels: default_channels(),
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    /// Check values a device could accept
    pub fn validate(&self) -> Result<(), AudioError> {
        if !(8000..=192_000).contains(&self.sample_rate) {
            return Err(AudioError::InvalidConfig(format!(
                "sample rate {} out of range",
                self.sample_rate
            )));
        }
        if self.channels == 0 {
            return Err(AudioError::InvalidConfig("zero channels".to_string()));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(AudioError::InvalidConfig(format!(
                "volume {} out of range",
                self.volume
            )));
        }
        Ok(())
    }

    /// Buffer latency in milliseconds
    pub fn latency_ms(&self) -> f64 {
        (self.buffer_size as f64 / self.sample_rate as f64) * 1000.0
    }
}

/// Handle to the thread that owns the cpal stream
struct StreamThread {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Synthesized output on the default device
pub struct SynthOutput {
    config: AudioConfig,
    bank: Arc<Mutex<VoiceBank>>,
    stream: Mutex<Option<StreamThread>>,
}

impl SynthOutput {
    /// Create an output; no device is opened until `ensure_ready`
    pub fn new(config: AudioConfig) -> Self {
        let mut bank = VoiceBank::new(config.sample_rate);
        bank.set_gain(config.volume);
        Self {
            config,
            bank: Arc::new(Mutex::new(bank)),
            stream: Mutex::new(None),
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    fn open(&self) -> Result<StreamThread, AudioError> {
        self.config.validate()?;

        let (ready_tx, ready_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let config = self.config.clone();
        let bank = Arc::clone(&self.bank);

        let handle = thread::Builder::new()
            .name("scale-audio".to_string())
            .spawn(move || {
                let stream = match build_stream(&config, bank) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                // Park until dispose; either a message or a dropped sender ends it
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| AudioError::InitFailed(format!("Failed to spawn audio thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(StreamThread {
                stop: stop_tx,
                handle,
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => Err(AudioError::InitFailed("audio thread exited".to_string())),
        }
    }
}

fn build_stream(config: &AudioConfig, bank: Arc<Mutex<VoiceBank>>) -> Result<Stream, AudioError> {
    let host = cpal::default_host();

    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

    let _supported_config = device
        .default_output_config()
        .map_err(|e| AudioError::InitFailed(format!("Failed to get default config: {}", e)))?;

    let stream_config = StreamConfig {
        channels: config.channels,
        sample_rate: cpal::SampleRate(config.sample_rate),
        buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
    };

    let channels = config.channels as usize;

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for sample in data.iter_mut() {
                    *sample = 0.0;
                }
                if let Ok(mut bank) = bank.lock() {
                    bank.render(data, channels);
                }
            },
            move |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::StreamFailed(format!("Failed to build stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| AudioError::StreamFailed(format!("Failed to start stream: {}", e)))?;

    Ok(stream)
}

impl AudioSink for SynthOutput {
    fn ensure_ready(&self) -> Result<(), AudioError> {
        let mut stream = self.stream.lock().map_err(|_| AudioError::LockFailed)?;
        if stream.is_some() {
            return Ok(());
        }
        *stream = Some(self.open()?);
        info!(
            "Audio output ready ({} Hz, {:.1} ms buffer)",
            self.config.sample_rate,
            self.config.latency_ms()
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.stream.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn now(&self) -> f64 {
        self.bank.lock().map(|b| b.now()).unwrap_or(0.0)
    }

    fn schedule(&self, voice: VoiceSpec) -> Result<(), AudioError> {
        if !self.is_ready() {
            return Err(AudioError::NotReady);
        }
        let mut bank = self.bank.lock().map_err(|_| AudioError::LockFailed)?;
        debug!("Voice {:.2} Hz at {:.3}s", voice.frequency, voice.start);
        bank.schedule(voice);
        Ok(())
    }

    fn cancel_generation(&self, generation: Generation) {
        if let Ok(mut bank) = self.bank.lock() {
            bank.cancel_generation(generation);
        }
    }

    fn dispose(&self) {
        let thread = match self.stream.lock() {
            Ok(mut stream) => stream.take(),
            Err(_) => None,
        };
        if let Some(thread) = thread {
            let _ = thread.stop.send(());
            let _ = thread.handle.join();
            info!("Audio output closed");
        }
        if let Ok(mut bank) = self.bank.lock() {
            bank.clear();
        }
    }
}

impl Drop for SynthOutput {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// List available audio output devices
pub fn list_devices() -> Vec<String> {
    let host = cpal::default_host();
    host.output_devices()
        .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

/// Get default device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}
