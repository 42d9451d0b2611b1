//! Wire representation of a promotion

use chrono::Local;
use promo_common::Promotion;
use serde::Serialize;

/// Promotion as rendered on the read API.
///
/// The id is rendered in uppercase canonical form and the expiration date in
/// local time without an offset, matching the published output contract.
#[derive(Debug, Serialize)]
pub struct PromotionDto {
    pub id: String,
    pub price: f64,
    pub expiration_date: String,
}

impl From<&Promotion> for PromotionDto {
    fn from(promotion: &Promotion) -> Self {
        Self {
            id: promotion.id.to_string().to_uppercase(),
            price: promotion.price,
            expiration_date: promotion
                .expiration_date
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDateTime};
    use uuid::Uuid;

    fn sample() -> Promotion {
        Promotion::new(
            Uuid::parse_str("11111111-2222-3333-4444-555555555555").unwrap(),
            9.99,
            DateTime::parse_from_rfc3339("2030-01-01T00:00:00+00:00").unwrap(),
        )
    }

    #[test]
    fn id_is_rendered_uppercase() {
        let dto = PromotionDto::from(&sample());
        assert_eq!(dto.id, "11111111-2222-3333-4444-555555555555".to_uppercase());
    }

    #[test]
    fn expiration_is_rendered_without_offset() {
        let dto = PromotionDto::from(&sample());
        // Local-time rendering depends on the host timezone; assert the shape.
        assert!(
            NaiveDateTime::parse_from_str(&dto.expiration_date, "%Y-%m-%d %H:%M:%S").is_ok(),
            "unexpected expiration rendering: {}",
            dto.expiration_date
        );
    }
}
