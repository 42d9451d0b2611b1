//! Pipeline tests that need no database: streaming decode and the
//! debounced directory watcher.
//!
//! Watcher tests exercise real filesystem notifications and timers, so they
//! use deliberately generous windows to stay stable on slow machines.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use promo_common::Promotion;
use promo_server::ingest::{stream_records, DropWatcher};
use tokio::sync::mpsc;

const QUIET_WINDOW: Duration = Duration::from_millis(150);
const READY_TIMEOUT: Duration = Duration::from_secs(3);

const VALID_A: &str = "11111111-1111-1111-1111-111111111111,9.99,2030-01-01 00:00:00 +0000 UTC";
const VALID_B: &str = "22222222-2222-2222-2222-222222222222,5.00,2031-06-15 12:00:00 +0200 CEST";

async fn decode_file(content: &str) -> (promo_server::ingest::DecodeSummary, Vec<Promotion>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop.csv");
    std::fs::write(&path, content).unwrap();

    let file = tokio::fs::File::open(&path).await.unwrap();
    let (tx, mut rx) = mpsc::channel(64);
    let summary = stream_records(path, file, tx).await;

    let mut records = Vec::new();
    while let Some(record) = rx.recv().await {
        records.push(record);
    }

    (summary, records)
}

#[tokio::test]
async fn valid_lines_pass_in_file_order() {
    let content = format!("{VALID_A}\n{VALID_B}\n");
    let (summary, records) = decode_file(&content).await;

    assert_eq!(summary.lines_read, 2);
    assert_eq!(summary.records_sent, 2);
    assert_eq!(summary.lines_skipped, 0);
    assert_eq!(records[0].price, 9.99);
    assert_eq!(records[1].price, 5.00);
}

#[tokio::test]
async fn malformed_lines_are_skipped_not_fatal() {
    let content = format!(
        "{VALID_A}\nnot-a-uuid,1.00,2030-01-01 00:00:00 +0000 UTC\ngarbage\n{VALID_B}\n"
    );
    let (summary, records) = decode_file(&content).await;

    assert_eq!(summary.lines_read, 4);
    assert_eq!(summary.records_sent, 2);
    assert_eq!(summary.lines_skipped, 2);
    // Valid records still arrive, in file order.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].price, 9.99);
    assert_eq!(records[1].price, 5.00);
}

#[tokio::test]
async fn blank_lines_are_skipped_quietly() {
    let content = format!("{VALID_A}\n\n\n");
    let (summary, records) = decode_file(&content).await;

    assert_eq!(summary.records_sent, 1);
    assert_eq!(summary.lines_skipped, 2);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn empty_file_yields_no_records() {
    let (summary, records) = decode_file("").await;

    assert_eq!(summary.lines_read, 0);
    assert_eq!(summary.records_sent, 0);
    assert!(records.is_empty());
}

async fn expect_ready(watcher: &mut DropWatcher) -> PathBuf {
    tokio::time::timeout(READY_TIMEOUT, watcher.next_ready())
        .await
        .expect("timed out waiting for file-ready notification")
        .expect("watcher shut down unexpectedly")
}

#[tokio::test(flavor = "multi_thread")]
async fn burst_of_writes_produces_one_notification() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = DropWatcher::spawn(dir.path(), QUIET_WINDOW).unwrap();

    let path = dir.path().join("a.csv");
    let mut last_write = Instant::now();
    for i in 0..4 {
        std::fs::write(&path, format!("line {i}\n")).unwrap();
        last_write = Instant::now();
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    let ready = expect_ready(&mut watcher).await;
    assert_eq!(ready, path);
    // Fired only after writes stayed quiet for the full window.
    assert!(last_write.elapsed() >= QUIET_WINDOW);

    // The burst collapses to exactly one notification.
    let extra = tokio::time::timeout(Duration::from_millis(400), watcher.next_ready()).await;
    assert!(extra.is_err(), "unexpected second notification: {extra:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn distinct_paths_debounce_independently() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = DropWatcher::spawn(dir.path(), QUIET_WINDOW).unwrap();

    let path_a = dir.path().join("a.csv");
    let path_b = dir.path().join("b.csv");
    std::fs::write(&path_a, "first\n").unwrap();
    std::fs::write(&path_b, "second\n").unwrap();

    let first = expect_ready(&mut watcher).await;
    let second = expect_ready(&mut watcher).await;

    let mut got = vec![first, second];
    got.sort();
    assert_eq!(got, vec![path_a, path_b]);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_csv_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = DropWatcher::spawn(dir.path(), QUIET_WINDOW).unwrap();

    std::fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();
    std::fs::write(dir.path().join("a.csv.tmp"), "ignored\n").unwrap();

    let ready = tokio::time::timeout(Duration::from_millis(500), watcher.next_ready()).await;
    assert!(ready.is_err(), "unexpected notification: {ready:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn spawn_creates_missing_input_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("incoming");
    assert!(!nested.exists());

    let mut watcher = DropWatcher::spawn(&nested, QUIET_WINDOW).unwrap();
    assert!(nested.is_dir());

    std::fs::write(nested.join("a.csv"), "payload\n").unwrap();
    let ready = expect_ready(&mut watcher).await;
    assert_eq!(ready, nested.join("a.csv"));
}
