// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piano scale practice.
//!
//! The core is a spelling-aware scale engine: 48 catalog scales, their
//! enharmonic twins, and octave assignment that keeps audio, keyboard and
//! staff in agreement. Around it sit playback, spaced-repetition practice
//! selection, persistence and settings.

pub mod audio;
pub mod config;
pub mod music;
pub mod playback;
pub mod practice;
pub mod storage;
