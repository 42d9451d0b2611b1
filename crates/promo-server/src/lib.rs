//! Promostore Server Library
//!
//! Ingests append-only promotion drop files from a watched directory into
//! PostgreSQL and exposes the stored promotions over a small HTTP API.
//!
//! # Architecture
//!
//! - **config**: environment-based configuration (server, database, ingest)
//! - **db**: PostgreSQL connection pool setup
//! - **ingest**: the ingestion pipeline (watcher, codec, decoder,
//!   orchestrator, persistence strategies)
//! - **features**: vertical API slices (promotion lookup)
//! - **api**: shared HTTP response types
//! - **error**: server-wide error type with HTTP mapping

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;

pub use error::{AppError, AppResult};
