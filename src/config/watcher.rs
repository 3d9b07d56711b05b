// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Hot reload for the settings file.
//!
//! The parent directory is watched rather than the file itself, so
//! editors that save by writing a new file and renaming it over the old
//! one are still picked up.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::runtime::Handle;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{debug, info, warn};

use super::Settings;

/// Events emitted by the settings watcher
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    /// Settings file changed and loaded cleanly
    Reloaded(Box<Settings>),
    /// Settings file changed but failed to load; the old settings stand
    Error(String),
}

/// Settings file watcher with debouncing and validation
pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<SettingsEvent>,
    watched_path: PathBuf,
}

impl SettingsWatcher {
    /// Watch a settings file.
    ///
    /// Changes are reported once no further change has arrived for
    /// `debounce_ms` milliseconds (default 500).
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce = Duration::from_millis(debounce_ms.unwrap_or(500));
        let file_name: OsString = watched_path
            .file_name()
            .ok_or_else(|| anyhow!("Settings path has no file name: {:?}", watched_path))?
            .to_os_string();
        let dir = match watched_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx): (Sender<SettingsEvent>, Receiver<SettingsEvent>) =
            mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", dir, e))?;
        info!("Watching {:?} for settings changes", watched_path);

        let reload_path = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_change: Option<Instant> = None;

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        let touches_file = event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == Some(file_name.as_os_str()));
                        let is_change =
                            matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                        if touches_file && is_change {
                            debug!("Settings change: {:?}", event.kind);
                            last_change = Some(Instant::now());
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let settled = last_change.is_some_and(|t| t.elapsed() >= debounce);
                        if !settled {
                            continue;
                        }
                        last_change = None;
                        let event = match Settings::load(&reload_path) {
                            Ok(settings) => {
                                info!("Reloaded settings from {:?}", reload_path);
                                SettingsEvent::Reloaded(Box::new(settings))
                            }
                            Err(e) => {
                                warn!("Keeping previous settings: {:#}", e);
                                SettingsEvent::Error(format!("{:#}", e))
                            }
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next settings event (non-blocking)
    pub fn try_recv(&self) -> Option<SettingsEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending settings events
    pub fn recv_all(&self) -> Vec<SettingsEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait up to `timeout` for the next settings event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SettingsEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }

    /// Hand the watcher to tokio's blocking pool and receive its events
    /// asynchronously.
    ///
    /// Forwarding stops once the returned receiver is dropped. Must be
    /// called from within a tokio runtime.
    pub fn into_channel(self) -> Result<tokio_mpsc::Receiver<SettingsEvent>> {
        let runtime = Handle::try_current()
            .map_err(|_| anyhow!("Settings watcher channel needs a tokio runtime"))?;
        let (tx, rx) = tokio_mpsc::channel(16);
        runtime.spawn_blocking(move || {
            while !tx.is_closed() {
                if let Some(event) = self.recv_timeout(Duration::from_millis(100)) {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            }
            debug!("Stopped forwarding events for {:?}", self.watched_path);
        });
        Ok(rx)
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::Tempo;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_watcher_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "tempo: slow\n").unwrap();

        let watcher = SettingsWatcher::new(&path, Some(100)).unwrap();
        assert_eq!(watcher.watched_path(), path.as_path());
        assert!(watcher.try_recv().is_none());
    }

    #[test]
    fn test_watcher_detects_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "tempo: slow\n").unwrap();

        let watcher = SettingsWatcher::new(&path, Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        fs::write(&path, "tempo: fast\n").unwrap();

        // File events may not be delivered on every CI filesystem, so only
        // check the payload when one arrives
        if let Some(SettingsEvent::Reloaded(settings)) =
            watcher.recv_timeout(Duration::from_secs(2))
        {
            assert_eq!(settings.tempo, Tempo::Fast);
        }
    }

    #[test]
    fn test_watcher_reports_bad_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "tempo: slow\n").unwrap();

        let watcher = SettingsWatcher::new(&path, Some(100)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        fs::write(&path, "daily_scale_count: 0\n").unwrap();

        if let Some(event) = watcher.recv_timeout(Duration::from_secs(2)) {
            assert!(matches!(event, SettingsEvent::Error(_)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_channel_delivers_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "tempo: slow\n").unwrap();

        let mut events = SettingsWatcher::new(&path, Some(100))
            .unwrap()
            .into_channel()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, "tempo: fast\n").unwrap();

        // Same caveat as above: only check the payload when an event arrives
        if let Ok(Some(SettingsEvent::Reloaded(settings))) =
            tokio::time::timeout(Duration::from_secs(2), events.recv()).await
        {
            assert_eq!(settings.tempo, Tempo::Fast);
        }
    }

    #[test]
    fn test_channel_outside_runtime_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "tempo: slow\n").unwrap();

        let watcher = SettingsWatcher::new(&path, Some(100)).unwrap();
        assert!(watcher.into_channel().is_err());
    }

    #[test]
    fn test_path_without_file_name_rejected() {
        assert!(SettingsWatcher::new("/", None).is_err());
    }
}
