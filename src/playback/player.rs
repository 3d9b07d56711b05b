// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scheduling plans on an audio sink and reporting progress.
//!
//! Every call to `play` starts a new generation. Voices are tagged with it
//! and the progress task checks it before each event, so a newer playback
//! (or an explicit cancel) silences the old one and suppresses its
//! remaining events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::plan::{PlannedNote, PlaybackPlan};
use crate::audio::{AudioError, AudioSink, Generation, VoiceSpec};
use crate::music::{Highlight, Pitch};

/// Progress reported while a plan plays
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A note has started sounding
    NoteStarted {
        generation: Generation,
        display_index: usize,
        play_index: usize,
        label: String,
        pitch: Pitch,
    },
    /// An up-and-down plan has turned around
    DirectionChanged { generation: Generation },
    /// The last note has finished; highlights should clear
    Cleared { generation: Generation },
}

impl PlaybackEvent {
    pub fn generation(&self) -> Generation {
        match self {
            PlaybackEvent::NoteStarted { generation, .. }
            | PlaybackEvent::DirectionChanged { generation }
            | PlaybackEvent::Cleared { generation } => *generation,
        }
    }

    /// Highlight to show for this event, if it starts a note
    pub fn highlight(&self) -> Option<Highlight> {
        match self {
            PlaybackEvent::NoteStarted {
                display_index,
                pitch,
                ..
            } => Some(Highlight::new(*display_index, *pitch)),
            _ => None,
        }
    }
}

/// Plays plans on a shared sink
pub struct Player {
    sink: Arc<dyn AudioSink>,
    generation: Arc<AtomicU64>,
}

impl Player {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            sink,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The sink this player schedules on
    pub fn sink(&self) -> &Arc<dyn AudioSink> {
        &self.sink
    }

    /// Generation of the most recent playback (0 before the first)
    pub fn current_generation(&self) -> Generation {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start playing a plan, superseding any playback in progress.
    ///
    /// Returns once every voice is scheduled. Progress arrives on the
    /// returned handle. Must be called from within a tokio runtime.
    pub fn play(&self, plan: &PlaybackPlan) -> Result<Playback, AudioError> {
        let runtime = Handle::try_current().map_err(|_| AudioError::NoRuntime)?;
        self.sink.ensure_ready()?;

        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        let generation = previous + 1;
        self.sink.cancel_generation(previous);

        let base = self.sink.now();
        for note in plan.notes() {
            self.sink.schedule(VoiceSpec {
                frequency: note.frequency,
                start: base + note.start,
                duration: note.duration,
                generation,
            })?;
        }
        info!(
            "Playing {} {} at {} tempo (generation {})",
            plan.scale_name(),
            plan.mode(),
            plan.tempo(),
            generation
        );

        let (tx, rx) = mpsc::channel(plan.notes().len() + 2);
        let task = runtime.spawn(report_progress(
            plan.notes().to_vec(),
            plan.direction_change(),
            plan.clear_time(),
            generation,
            Arc::clone(&self.generation),
            tx,
        ));

        Ok(Playback {
            generation,
            events: rx,
            current: Arc::clone(&self.generation),
            sink: Arc::clone(&self.sink),
            task,
        })
    }

    /// Cancel whatever is playing
    pub fn stop(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        self.sink.cancel_generation(previous);
        debug!("Stopped generation {}", previous);
    }

    /// Stop playback and release the audio device
    pub fn dispose(&self) {
        self.stop();
        self.sink.dispose();
    }
}

async fn report_progress(
    notes: Vec<PlannedNote>,
    direction_change: Option<usize>,
    clear_time: f64,
    generation: Generation,
    current: Arc<AtomicU64>,
    tx: mpsc::Sender<PlaybackEvent>,
) {
    let start = Instant::now();
    let is_current = || current.load(Ordering::SeqCst) == generation;

    for note in notes {
        sleep_until(start + Duration::from_secs_f64(note.start)).await;
        if !is_current() {
            return;
        }
        if direction_change == Some(note.play_index)
            && tx
                .send(PlaybackEvent::DirectionChanged { generation })
                .await
                .is_err()
        {
            return;
        }
        let event = PlaybackEvent::NoteStarted {
            generation,
            display_index: note.display_index,
            play_index: note.play_index,
            label: note.label(),
            pitch: note.pitch,
        };
        if tx.send(event).await.is_err() {
            return;
        }
    }

    sleep_until(start + Duration::from_secs_f64(clear_time)).await;
    if is_current() {
        let _ = tx.send(PlaybackEvent::Cleared { generation }).await;
    }
}

/// Handle to one running playback
pub struct Playback {
    generation: Generation,
    events: mpsc::Receiver<PlaybackEvent>,
    current: Arc<AtomicU64>,
    sink: Arc<dyn AudioSink>,
    task: JoinHandle<()>,
}

impl Playback {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether no newer playback or cancel has superseded this one
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Next progress event; `None` once the playback has ended or been superseded
    pub async fn next_event(&mut self) -> Option<PlaybackEvent> {
        self.events.recv().await
    }

    /// Stop this playback if it is still the current one
    pub fn cancel(&self) {
        let superseded = self
            .current
            .compare_exchange(
                self.generation,
                self.generation + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if superseded {
            self.sink.cancel_generation(self.generation);
            debug!("Cancelled generation {}", self.generation);
        }
        self.task.abort();
    }

    /// Collect every remaining event
    pub async fn collect(mut self) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CaptureSink;
    use crate::music::{find, DEFAULT_START_OCTAVE};
    use crate::playback::plan::{PlaybackMode, Tempo};

    fn plan(name: &str, mode: PlaybackMode) -> PlaybackPlan {
        PlaybackPlan::build(find(name).unwrap(), mode, Tempo::Fast, DEFAULT_START_OCTAVE)
    }

    fn player() -> (Arc<CaptureSink>, Player) {
        let sink = Arc::new(CaptureSink::new());
        let player = Player::new(sink.clone());
        (sink, player)
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_emits_events_in_order() {
        let (sink, player) = player();
        let playback = player.play(&plan("C Major", PlaybackMode::Ascending)).unwrap();
        assert_eq!(sink.voices().len(), 8);
        assert_eq!(sink.open_count(), 1);

        let events = playback.collect().await;
        assert_eq!(events.len(), 9);
        let labels: Vec<String> = events
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::NoteStarted { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]);
        assert!(matches!(events.last(), Some(PlaybackEvent::Cleared { generation: 1 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_plan_timing() {
        let (_sink, player) = player();
        let plan = plan("G Major", PlaybackMode::Ascending);
        let start = Instant::now();
        let mut playback = player.play(&plan).unwrap();

        let mut onsets = Vec::new();
        while let Some(event) = playback.next_event().await {
            onsets.push((event, start.elapsed().as_secs_f64()));
        }
        let (_, first) = &onsets[0];
        let (_, second) = &onsets[1];
        assert!((first - 0.1).abs() < 0.01);
        assert!((second - first - 0.3).abs() < 0.01);
        let (_, cleared) = onsets.last().unwrap();
        assert!((cleared - plan.clear_time()).abs() < 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_up_and_down_reports_direction_change() {
        let (_sink, player) = player();
        let playback = player
            .play(&plan("A Melodic Minor", PlaybackMode::UpAndDown))
            .unwrap();
        let events = playback.collect().await;
        let turn = events
            .iter()
            .position(|e| matches!(e, PlaybackEvent::DirectionChanged { .. }))
            .unwrap();
        match &events[turn + 1] {
            PlaybackEvent::NoteStarted {
                play_index,
                display_index,
                label,
                ..
            } => {
                assert_eq!(*play_index, 8);
                assert_eq!(*display_index, 6);
                assert_eq!(label, "G5");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_play_supersedes_old() {
        let (sink, player) = player();
        let first = player.play(&plan("C Major", PlaybackMode::Ascending)).unwrap();
        let second = player.play(&plan("D Major", PlaybackMode::Ascending)).unwrap();

        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(sink.cancelled_generations().contains(&first.generation()));
        assert!(sink.live_voices().iter().all(|v| v.generation == second.generation()));

        assert!(first.collect().await.is_empty());
        let events = second.collect().await;
        assert_eq!(events.len(), 9);
        assert!(events.iter().all(|e| e.generation() == 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_events_and_voices() {
        let (sink, player) = player();
        let mut playback = player.play(&plan("E Major", PlaybackMode::Ascending)).unwrap();
        let first = playback.next_event().await.unwrap();
        assert_eq!(first.highlight().map(|h| h.display_index), Some(0));

        playback.cancel();
        assert!(!playback.is_current());
        assert!(sink.cancelled_generations().contains(&1));
        assert_eq!(playback.next_event().await, None);

        // Cancelling a superseded playback leaves the newer one alone
        let newer = player.play(&plan("F Major", PlaybackMode::Ascending)).unwrap();
        playback.cancel();
        assert!(newer.is_current());
    }

    #[tokio::test]
    async fn test_dispose_releases_sink() {
        let (sink, player) = player();
        let _playback = player.play(&plan("C Major", PlaybackMode::Descending)).unwrap();
        player.dispose();
        assert!(!sink.is_ready());
    }

    #[test]
    fn test_play_outside_runtime_fails() {
        let (_sink, player) = player();
        let result = player.play(&plan("C Major", PlaybackMode::Ascending));
        assert!(matches!(result, Err(AudioError::NoRuntime)));
    }
}
