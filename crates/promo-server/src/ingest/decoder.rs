//! Streaming decode of an open drop file
//!
//! Reads line by line with bounded memory, decodes each line through the
//! codec, and forwards records in file order into a bounded channel. Faulty
//! lines are logged and skipped; one bad line never aborts the file. Closing
//! the channel (by returning) is the sole end-of-stream signal downstream.

use std::path::PathBuf;

use promo_common::Promotion;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::codec;

/// Counters describing one file's decode pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub lines_read: u64,
    pub records_sent: u64,
    pub lines_skipped: u64,
}

/// Drive one file through the codec, forwarding records into `tx`.
///
/// The stream is finite and not restartable; the file handle is consumed.
/// Dropping `tx` on return closes the record stream.
pub async fn stream_records(
    path: PathBuf,
    file: File,
    tx: mpsc::Sender<Promotion>,
) -> DecodeSummary {
    debug!(path = %path.display(), "Start processing drop file");

    let mut lines = BufReader::new(file).lines();
    let mut summary = DecodeSummary::default();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Read error, stopping decode");
                break;
            },
        };
        summary.lines_read += 1;

        if line.trim().is_empty() {
            summary.lines_skipped += 1;
            continue;
        }

        match codec::decode_line(&line) {
            Ok(record) => {
                if tx.send(record).await.is_err() {
                    // Consumer is gone (e.g. an aborted replace-all).
                    warn!(path = %path.display(), "Record consumer dropped, stopping decode");
                    break;
                }
                summary.records_sent += 1;
            },
            Err(error) => {
                warn!(
                    path = %path.display(),
                    line = summary.lines_read,
                    error = %error,
                    "Skipping malformed line"
                );
                summary.lines_skipped += 1;
            },
        }
    }

    debug!(
        path = %path.display(),
        lines = summary.lines_read,
        records = summary.records_sent,
        skipped = summary.lines_skipped,
        "Processed drop file"
    );

    summary
}
