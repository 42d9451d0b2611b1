//! Common types used across promostore

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A priced, time-bounded offer.
///
/// The positional `sequence` used for index-style lookup is assigned by the
/// store, not carried by the record itself, so it does not appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub price: f64,
    pub expiration_date: DateTime<FixedOffset>,
}

impl Promotion {
    pub fn new(id: Uuid, price: f64, expiration_date: DateTime<FixedOffset>) -> Self {
        Self {
            id,
            price,
            expiration_date,
        }
    }
}

/// Consistency policy applied when a drop file is materialized into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngestMode {
    /// Merge records one by one, keyed by promotion id.
    Simple,
    /// Replace the entire dataset per file inside one transaction.
    Immutable,
}

impl std::str::FromStr for IngestMode {
    type Err = crate::PromoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SIMPLE" => Ok(IngestMode::Simple),
            "IMMUTABLE" => Ok(IngestMode::Immutable),
            other => Err(crate::PromoError::Config(format!(
                "unsupported ingest mode: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for IngestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestMode::Simple => write!(f, "SIMPLE"),
            IngestMode::Immutable => write!(f, "IMMUTABLE"),
        }
    }
}
