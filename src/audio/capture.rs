// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A sink that records voices instead of playing them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use super::{AudioError, AudioSink, Generation, VoiceSpec};

/// Records scheduled voices; used for `--silent` runs and tests
#[derive(Debug)]
pub struct CaptureSink {
    epoch: Instant,
    ready: AtomicBool,
    opened: AtomicUsize,
    voices: Mutex<Vec<VoiceSpec>>,
    cancelled: Mutex<Vec<Generation>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            ready: AtomicBool::new(false),
            opened: AtomicUsize::new(0),
            voices: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    /// Every voice scheduled so far, cancelled ones included
    pub fn voices(&self) -> Vec<VoiceSpec> {
        self.voices.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Voices whose generation has not been cancelled
    pub fn live_voices(&self) -> Vec<VoiceSpec> {
        let cancelled = self.cancelled_generations();
        self.voices()
            .into_iter()
            .filter(|v| !cancelled.contains(&v.generation))
            .collect()
    }

    /// Generations passed to `cancel_generation`, in call order
    pub fn cancelled_generations(&self) -> Vec<Generation> {
        self.cancelled.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// How many times the sink went from closed to ready
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for CaptureSink {
    fn ensure_ready(&self) -> Result<(), AudioError> {
        if !self.ready.swap(true, Ordering::SeqCst) {
            self.opened.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn schedule(&self, voice: VoiceSpec) -> Result<(), AudioError> {
        if !self.is_ready() {
            return Err(AudioError::NotReady);
        }
        self.voices
            .lock()
            .map_err(|_| AudioError::LockFailed)?
            .push(voice);
        Ok(())
    }

    fn cancel_generation(&self, generation: Generation) {
        if let Ok(mut cancelled) = self.cancelled.lock() {
            cancelled.push(generation);
        }
    }

    fn dispose(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(generation: Generation) -> VoiceSpec {
        VoiceSpec {
            frequency: 261.63,
            start: 0.0,
            duration: 0.5,
            generation,
        }
    }

    #[test]
    fn test_ensure_ready_is_idempotent() {
        let sink = CaptureSink::new();
        assert!(!sink.is_ready());
        sink.ensure_ready().unwrap();
        sink.ensure_ready().unwrap();
        assert!(sink.is_ready());
        assert_eq!(sink.open_count(), 1);

        sink.dispose();
        assert!(!sink.is_ready());
        sink.ensure_ready().unwrap();
        assert_eq!(sink.open_count(), 2);
    }

    #[test]
    fn test_schedule_requires_ready() {
        let sink = CaptureSink::new();
        assert_eq!(sink.schedule(voice(1)), Err(AudioError::NotReady));
        sink.ensure_ready().unwrap();
        sink.schedule(voice(1)).unwrap();
        assert_eq!(sink.voices().len(), 1);
    }

    #[test]
    fn test_live_voices_excludes_cancelled() {
        let sink = CaptureSink::new();
        sink.ensure_ready().unwrap();
        sink.schedule(voice(1)).unwrap();
        sink.schedule(voice(2)).unwrap();
        sink.cancel_generation(1);
        assert_eq!(sink.live_voices(), vec![voice(2)]);
        assert_eq!(sink.cancelled_generations(), vec![1]);
    }
}
