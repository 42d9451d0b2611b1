//! Per-line decoding of promotion drop records
//!
//! A drop record is one CSV line: `id,price,expiration`. Decoding is
//! all-or-nothing per line; no partial records are ever produced.

use chrono::{DateTime, FixedOffset};
use promo_common::Promotion;
use thiserror::Error;
use uuid::Uuid;

/// Field separator in drop records.
pub const FIELD_SEPARATOR: char = ',';

/// Canonical expiration format, e.g. `2030-01-01 00:00:00 +0000 UTC`.
/// The numeric offset is authoritative; a trailing zone name is dropped
/// before parsing.
const EXPIRATION_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// The record field a decode fault points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Id,
    Price,
    ExpirationDate,
    FieldCount,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordField::Id => write!(f, "id"),
            RecordField::Price => write!(f, "price"),
            RecordField::ExpirationDate => write!(f, "expiration date"),
            RecordField::FieldCount => write!(f, "field count"),
        }
    }
}

/// A failed decode of one drop record line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: '{raw}'")]
pub struct DecodeError {
    pub field: RecordField,
    pub raw: String,
}

impl DecodeError {
    fn new(field: RecordField, raw: &str) -> Self {
        Self {
            field,
            raw: raw.to_string(),
        }
    }
}

/// Decode one drop record line into a promotion.
pub fn decode_line(line: &str) -> Result<Promotion, DecodeError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(DecodeError::new(RecordField::FieldCount, line));
    }

    let id = Uuid::parse_str(fields[0].trim())
        .map_err(|_| DecodeError::new(RecordField::Id, fields[0]))?;

    let price: f64 = fields[1]
        .trim()
        .parse()
        .map_err(|_| DecodeError::new(RecordField::Price, fields[1]))?;
    if !price.is_finite() || price < 0.0 {
        return Err(DecodeError::new(RecordField::Price, fields[1]));
    }

    let expiration_date = parse_expiration(fields[2].trim())
        .ok_or_else(|| DecodeError::new(RecordField::ExpirationDate, fields[2]))?;

    Ok(Promotion::new(id, price, expiration_date))
}

fn parse_expiration(raw: &str) -> Option<DateTime<FixedOffset>> {
    // Strip a trailing alphabetic zone name ("UTC", "CET") if present.
    let without_zone_name = match raw.rsplit_once(' ') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic()) => {
            head
        },
        _ => raw,
    };

    DateTime::parse_from_str(without_zone_name, EXPIRATION_FORMAT).ok()
}
