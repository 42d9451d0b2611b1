//! Drop-file ingestion pipeline
//!
//! Watches a directory for promotion drop files and materializes them into
//! the store under the configured consistency policy.
//!
//! # Architecture
//!
//! - **watcher**: debounced directory watcher emitting file-ready paths
//! - **codec**: per-line record decoding
//! - **decoder**: streaming file decode into a bounded record channel
//! - **strategy**: the two persistence policies (upsert / replace-all)
//! - **orchestrator**: the per-file state machine driving the above
//!
//! Data flow: filesystem events → watcher (debounce) → orchestrator →
//! decoder → record channel → persistence strategy → PostgreSQL.

pub mod codec;
pub mod decoder;
pub mod orchestrator;
pub mod strategy;
pub mod watcher;

pub use codec::{decode_line, DecodeError, RecordField};
pub use decoder::{stream_records, DecodeSummary};
pub use orchestrator::{FileOutcome, FileStatus, StorageUpdater};
pub use strategy::{ApplyOutcome, PersistStrategy};
pub use watcher::{DropWatcher, WatchError};
