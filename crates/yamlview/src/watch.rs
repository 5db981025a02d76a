//! Filesystem watching for the previewed document.
//!
//! Editors often save by writing a temporary file and renaming it over the
//! original, which replaces the inode. Watching the parent directory and
//! filtering by path survives that; watching the file itself does not.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEvent, Debouncer, new_debouncer};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::is_yaml_path;

/// Default debounce duration for filesystem events (in milliseconds).
const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Events emitted by the filesystem watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The watched YAML file was created, written, or replaced
    Modified(PathBuf),
}

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Watches a single YAML file for changes.
pub struct FileWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,

    event_rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl FileWatcher {
    /// Start watching `file`.
    ///
    /// The file must exist; its path is canonicalized so events can be
    /// matched against it.
    pub fn new(file: &Path, config: WatchConfig) -> Result<Self> {
        let target = file
            .canonicalize()
            .map_err(|_| Error::InputNotFound(file.to_path_buf()))?;
        let dir = target
            .parent()
            .ok_or_else(|| Error::Watch(format!("{} has no parent directory", target.display())))?
            .to_path_buf();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let watched = target.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(config.debounce_ms),
            move |res: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match res {
                Ok(events) => {
                    if events.iter().any(|event| is_target(&event.path, &watched)) {
                        debug!(path = %watched.display(), "File change detected");
                        if event_tx.send(WatchEvent::Modified(watched.clone())).is_err() {
                            debug!("Event receiver dropped, stopping watcher");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Filesystem watch error");
                }
            },
        )
        .map_err(|e| Error::Watch(format!("failed to create filesystem watcher: {}", e)))?;

        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("failed to watch {}: {}", dir.display(), e)))?;

        info!(
            path = %target.display(),
            debounce_ms = config.debounce_ms,
            "Started filesystem watcher"
        );

        Ok(Self {
            _debouncer: debouncer,
            event_rx,
        })
    }

    /// Receive the next watch event.
    ///
    /// Returns `None` if the watcher has been stopped.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.event_rx.recv().await
    }
}

/// Whether an event path refers to the watched YAML file.
fn is_target(path: &Path, target: &Path) -> bool {
    if !is_yaml_path(path) {
        return false;
    }
    path == target || path.canonicalize().is_ok_and(|p| p == target)
}
