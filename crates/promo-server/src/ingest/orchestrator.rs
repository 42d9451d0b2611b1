//! Ingestion orchestrator
//!
//! The per-file state machine: acquire (atomic rename), stream (decode into
//! a bounded channel), apply (persistence strategy), finalize (delete on
//! success). Files are processed sequentially by a single consumer loop so
//! that a replace-all rewrite never races another file.
//!
//! Temp-file policy: the `.tmp` rename marks a file as in flight and is
//! removed only after the strategy has durably applied the stream. A
//! leftover `.tmp` therefore always means an interrupted or failed
//! ingestion and is left for operator recovery.

use std::path::{Path, PathBuf};

use sqlx::PgPool;
use tokio::fs::File;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::decoder::{self, DecodeSummary};
use super::strategy::{ApplyOutcome, PersistStrategy};

/// Capacity of the decode → persist hand-off channel. Bounds memory and
/// applies backpressure when persistence lags behind decode.
const RECORD_CHANNEL_CAPACITY: usize = 64;

/// Suffix appended to a drop file while it is owned by the updater.
pub const IN_FLIGHT_SUFFIX: &str = ".tmp";

/// Terminal state of one file's ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Records durably applied; temp file removed.
    Applied,
    /// Rename or open failed; nothing was ingested, notification dropped.
    AcquireFailed,
    /// The strategy rejected the batch; temp file kept for recovery.
    ApplyFailed,
}

/// Structured result of one file's ingestion, independent of log output.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    pub decode: DecodeSummary,
    pub apply: ApplyOutcome,
}

impl FileOutcome {
    fn failed(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            decode: DecodeSummary::default(),
            apply: ApplyOutcome::default(),
        }
    }
}

/// Consumes file-ready notifications and drives each file through the
/// active persistence strategy.
pub struct StorageUpdater {
    pool: PgPool,
    strategy: PersistStrategy,
}

impl StorageUpdater {
    pub fn new(pool: PgPool, strategy: PersistStrategy) -> Self {
        Self { pool, strategy }
    }

    /// Consume notifications until the channel closes.
    ///
    /// No fault from one file terminates the loop.
    pub async fn run(self, mut ready: mpsc::Receiver<PathBuf>) {
        info!(strategy = ?self.strategy, "Storage updater started");

        while let Some(path) = ready.recv().await {
            let outcome = self.ingest_file(&path).await;
            if outcome.status == FileStatus::Applied {
                info!(
                    path = %outcome.path.display(),
                    applied = outcome.apply.applied,
                    failed = outcome.apply.failed,
                    skipped = outcome.decode.lines_skipped,
                    "Drop file ingested"
                );
            }
        }

        info!("Storage updater stopped");
    }

    /// Ingest one drop file: acquire → stream → apply → finalize.
    pub async fn ingest_file(&self, path: &Path) -> FileOutcome {
        let tmp_path = in_flight_path(path);
        if let Err(err) = tokio::fs::rename(path, &tmp_path).await {
            warn!(path = %path.display(), error = %err, "Failed to acquire drop file");
            return FileOutcome::failed(path, FileStatus::AcquireFailed);
        }

        let file = match File::open(&tmp_path).await {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %tmp_path.display(), error = %err, "Failed to open drop file");
                return FileOutcome::failed(path, FileStatus::AcquireFailed);
            },
        };

        let (tx, rx) = mpsc::channel(RECORD_CHANNEL_CAPACITY);
        let decode_task = tokio::spawn(decoder::stream_records(tmp_path.clone(), file, tx));

        // Blocks until the strategy has consumed the full stream.
        let apply_result = self.strategy.apply(&self.pool, rx).await;

        let decode = match decode_task.await {
            Ok(summary) => summary,
            Err(err) => {
                error!(path = %tmp_path.display(), error = %err, "Decode task panicked");
                DecodeSummary::default()
            },
        };

        match apply_result {
            Ok(apply) => {
                self.release(&tmp_path).await;
                FileOutcome {
                    path: path.to_path_buf(),
                    status: FileStatus::Applied,
                    decode,
                    apply,
                }
            },
            Err(err) => {
                error!(
                    path = %tmp_path.display(),
                    error = %err,
                    "Failed to apply drop file, keeping temp file for recovery"
                );
                FileOutcome {
                    path: path.to_path_buf(),
                    status: FileStatus::ApplyFailed,
                    decode,
                    apply: ApplyOutcome::default(),
                }
            },
        }
    }

    /// Delete the temp file after a successful apply. Non-fatal on failure.
    async fn release(&self, tmp_path: &Path) {
        if let Err(err) = tokio::fs::remove_file(tmp_path).await {
            warn!(path = %tmp_path.display(), error = %err, "Failed to remove temp file");
        }
    }
}

/// The in-flight name of a drop file (`name.csv` → `name.csv.tmp`).
pub fn in_flight_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(IN_FLIGHT_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_path_appends_suffix() {
        assert_eq!(
            in_flight_path(Path::new("/drop/a.csv")),
            PathBuf::from("/drop/a.csv.tmp")
        );
    }
}
