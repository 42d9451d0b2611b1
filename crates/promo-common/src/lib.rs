//! Promostore Common Library
//!
//! Shared types, error handling, and logging initialization for the
//! promostore workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across workspace members:
//!
//! - **Error Handling**: the `PromoError` taxonomy and `Result` alias
//! - **Logging**: `tracing` subscriber configuration and initialization
//! - **Types**: the promotion domain model and the ingestion mode switch

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PromoError, Result};
pub use types::{IngestMode, Promotion};
