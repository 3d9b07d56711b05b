// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Triangle-wave voices with a fixed practice envelope.

use super::{Generation, VoiceSpec};

/// Gain envelope applied to every voice.
///
/// Rises to `peak` over `attack`, falls to `sustain` over `decay`, holds,
/// then ramps linearly to silence over the final `release` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub peak: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.02,
            peak: 0.5,
            decay: 0.1,
            sustain: 0.3,
            release: 0.1,
        }
    }
}

impl Envelope {
    /// Gain `t` seconds into a note lasting `duration` seconds
    pub fn gain_at(&self, t: f64, duration: f64) -> f64 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }
        let release_start = (duration - self.release).max(0.0);
        if t < release_start {
            return self.held_level(t);
        }
        let level = self.held_level(release_start);
        level * (duration - t) / (duration - release_start)
    }

    fn held_level(&self, t: f64) -> f64 {
        if t < self.attack {
            self.peak * t / self.attack
        } else if t < self.attack + self.decay {
            let progress = (t - self.attack) / self.decay;
            self.peak + (self.sustain - self.peak) * progress
        } else {
            self.sustain
        }
    }
}

/// Triangle wave in [-1, 1] for a phase in [0, 1)
pub fn triangle(phase: f64) -> f64 {
    1.0 - 4.0 * (phase - 0.5).abs()
}

#[derive(Debug, Clone)]
struct Voice {
    spec: VoiceSpec,
    phase: f64,
}

/// Mixes scheduled voices into output buffers.
///
/// The bank owns the sample clock: `now()` advances only as audio is
/// rendered, so voice start times line up with what is actually heard.
#[derive(Debug)]
pub struct VoiceBank {
    sample_rate: u32,
    envelope: Envelope,
    voices: Vec<Voice>,
    /// Frames rendered so far
    frames: u64,
    gain: f32,
}

impl VoiceBank {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            envelope: Envelope::default(),
            voices: Vec::new(),
            frames: 0,
            gain: 1.0,
        }
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set master gain (0.0 - 1.0)
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    /// Queue a voice
    pub fn schedule(&mut self, spec: VoiceSpec) {
        self.voices.push(Voice { spec, phase: 0.0 });
    }

    /// Drop every voice of a generation
    pub fn cancel_generation(&mut self, generation: Generation) {
        self.voices.retain(|v| v.spec.generation != generation);
    }

    /// Drop every voice
    pub fn clear(&mut self) {
        self.voices.clear();
    }

    /// Voices not yet finished
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix voices into an interleaved buffer and advance the clock
    pub fn render(&mut self, buffer: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let rate = self.sample_rate as f64;
        let envelope = self.envelope;

        for frame in buffer.chunks_mut(channels) {
            let t = self.frames as f64 / rate;
            let mut sample = 0.0;
            for voice in &mut self.voices {
                let local = t - voice.spec.start;
                if local < 0.0 || local >= voice.spec.duration {
                    continue;
                }
                sample += triangle(voice.phase) * envelope.gain_at(local, voice.spec.duration);
                voice.phase = (voice.phase + voice.spec.frequency / rate).fract();
            }
            let value = (sample as f32 * self.gain).clamp(-1.0, 1.0);
            for out in frame.iter_mut() {
                *out += value;
            }
            self.frames += 1;
        }

        let now = self.now();
        self.voices.retain(|v| v.spec.end() > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_envelope_shape() {
        let env = Envelope::default();
        let duration = 0.5;
        assert!(approx(env.gain_at(0.0, duration), 0.0));
        assert!(approx(env.gain_at(0.01, duration), 0.25));
        assert!(approx(env.gain_at(0.02, duration), 0.5));
        assert!(approx(env.gain_at(0.07, duration), 0.4));
        assert!(approx(env.gain_at(0.12, duration), 0.3));
        assert!(approx(env.gain_at(0.4, duration), 0.3));
        assert!(approx(env.gain_at(0.45, duration), 0.15));
        assert!(approx(env.gain_at(0.5, duration), 0.0));
        assert!(approx(env.gain_at(-0.1, duration), 0.0));
    }

    #[test]
    fn test_triangle_wave() {
        assert!(approx(triangle(0.0), -1.0));
        assert!(approx(triangle(0.25), 0.0));
        assert!(approx(triangle(0.5), 1.0));
        assert!(approx(triangle(0.75), 0.0));
    }

    #[test]
    fn test_render_advances_clock_and_expires_voices() {
        let mut bank = VoiceBank::new(1000);
        bank.schedule(VoiceSpec {
            frequency: 100.0,
            start: 0.0,
            duration: 0.05,
            generation: 1,
        });
        let mut buffer = vec![0.0f32; 200];
        bank.render(&mut buffer, 2);
        assert!(approx(bank.now(), 0.1));
        assert_eq!(bank.active_voices(), 0);
        assert!(buffer.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_silent_before_start() {
        let mut bank = VoiceBank::new(1000);
        bank.schedule(VoiceSpec {
            frequency: 100.0,
            start: 1.0,
            duration: 0.5,
            generation: 1,
        });
        let mut buffer = vec![0.0f32; 100];
        bank.render(&mut buffer, 1);
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert_eq!(bank.active_voices(), 1);
    }

    #[test]
    fn test_cancel_generation() {
        let mut bank = VoiceBank::new(44100);
        for generation in [1, 1, 2] {
            bank.schedule(VoiceSpec {
                frequency: 440.0,
                start: 0.0,
                duration: 1.0,
                generation,
            });
        }
        bank.cancel_generation(1);
        assert_eq!(bank.active_voices(), 1);
        bank.clear();
        assert_eq!(bank.active_voices(), 0);
    }
}
