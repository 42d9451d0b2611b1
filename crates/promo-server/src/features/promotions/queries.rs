//! Read queries against the promotions table

use chrono::{DateTime, Utc};
use promo_common::Promotion;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: Uuid,
    price: f64,
    expiration_date: DateTime<Utc>,
}

impl From<PromotionRow> for Promotion {
    fn from(row: PromotionRow) -> Self {
        Promotion::new(row.id, row.price, row.expiration_date.fixed_offset())
    }
}

/// Look up a promotion by its stable identity.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Promotion>, sqlx::Error> {
    let row = sqlx::query_as::<_, PromotionRow>(
        "SELECT id, price, expiration_date FROM promotions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Promotion::from))
}

/// Look up a promotion by its store-assigned positional sequence.
pub async fn get_by_sequence(pool: &PgPool, sequence: i64) -> Result<Option<Promotion>, sqlx::Error> {
    let row = sqlx::query_as::<_, PromotionRow>(
        "SELECT id, price, expiration_date FROM promotions WHERE sequence = $1",
    )
    .bind(sequence)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Promotion::from))
}
