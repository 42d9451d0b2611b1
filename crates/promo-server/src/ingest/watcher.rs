//! Debounced directory watcher
//!
//! Subscribes to filesystem notifications for a single directory
//! (non-recursive) and emits a path once writes to it have stopped for a
//! quiet window. A burst of create/write events for the same file therefore
//! produces exactly one "file ready" notification.
//!
//! All debounce state is owned by one actor task: filesystem events and
//! timer expirations arrive on the same `select!` loop, so per-path timers
//! need no locking. Runtime errors from the notify backend are logged and
//! the loop keeps running; only a startup failure is surfaced to the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::time::delay_queue::{DelayQueue, Key};
use tracing::{debug, error, info};

/// Suffix a drop file must carry to be considered for ingestion.
pub const DROP_FILE_EXTENSION: &str = "csv";

/// Capacity of the raw notify event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the file-ready output channel.
const READY_CHANNEL_CAPACITY: usize = 16;

/// Failure to start watching the input directory.
///
/// Fatal to the process: it signals a misconfigured environment, not a
/// transient fault.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create input directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to watch input directory: {0}")]
    Notify(#[from] notify::Error),
}

/// A running debounced watch over one input directory.
pub struct DropWatcher {
    ready: mpsc::Receiver<PathBuf>,
}

impl DropWatcher {
    /// Start watching `dir`, creating it if absent.
    ///
    /// Emits each ready `.csv` path once writes to it have been quiet for
    /// `quiet_window`.
    pub fn spawn(dir: &Path, quiet_window: Duration) -> Result<Self, WatchError> {
        std::fs::create_dir_all(dir)?;

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut watcher =
            notify::recommended_watcher(move |event: notify::Result<Event>| {
                // Runs on the notify backend thread. A full channel drops the
                // event, which only delays readiness until the next write.
                let _ = event_tx.try_send(event);
            })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        info!(dir = %dir.display(), "Watching input directory");

        let (ready_tx, ready_rx) = mpsc::channel(READY_CHANNEL_CAPACITY);
        tokio::spawn(debounce_loop(watcher, event_rx, ready_tx, quiet_window));

        Ok(Self { ready: ready_rx })
    }

    /// Wait for the next ready file. `None` means the watch has shut down.
    pub async fn next_ready(&mut self) -> Option<PathBuf> {
        self.ready.recv().await
    }

    /// Hand the ready-file channel to a consumer loop.
    pub fn into_receiver(self) -> mpsc::Receiver<PathBuf> {
        self.ready
    }
}

/// Actor owning all per-path debounce timers.
async fn debounce_loop(
    watcher: RecommendedWatcher,
    mut events: mpsc::Receiver<notify::Result<Event>>,
    ready: mpsc::Sender<PathBuf>,
    quiet_window: Duration,
) {
    // Owning the backend keeps the subscription alive for the loop's lifetime.
    let _watcher = watcher;

    let mut timers: DelayQueue<PathBuf> = DelayQueue::new();
    let mut pending: HashMap<PathBuf, Key> = HashMap::new();

    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Some(Ok(event)) => event,
                    Some(Err(err)) => {
                        error!(error = %err, "Error while watching input directory");
                        continue;
                    },
                    // Backend gone; nothing more will arrive.
                    None => break,
                };

                if !is_relevant_kind(&event.kind) {
                    continue;
                }

                for path in event.paths {
                    if !is_drop_file(&path) {
                        continue;
                    }

                    match pending.get(&path) {
                        // Still being written: push the deadline out.
                        Some(key) => {
                            timers.reset(key, quiet_window);
                        },
                        None => {
                            let key = timers.insert(path.clone(), quiet_window);
                            pending.insert(path, key);
                        },
                    }
                }
            },
            Some(expired) = timers.next() => {
                let path = expired.into_inner();
                pending.remove(&path);
                debug!(path = %path.display(), "Drop file ready");
                if ready.send(path).await.is_err() {
                    // Consumer gone; stop watching.
                    break;
                }
            },
        }
    }
}

fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

fn is_drop_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(DROP_FILE_EXTENSION))
        .unwrap_or(false)
}
