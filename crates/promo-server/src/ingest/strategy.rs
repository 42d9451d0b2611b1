//! Persistence strategies
//!
//! Both strategies share one capability: accept a stream of records and
//! durably apply them, returning only once the stream is fully consumed.
//!
//! - **Upsert** (SIMPLE mode): merge each record independently by id. A
//!   failed write drops that record only.
//! - **ReplaceAll** (IMMUTABLE mode): wipe the table, reinsert the stream
//!   with fresh sequences starting at 1, all inside one transaction. Any
//!   failure rolls the whole rewrite back and the prior dataset survives.

use promo_common::{IngestMode, Promotion};
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{error, info};

const SQL_UPSERT_PROMOTION: &str = r#"
    INSERT INTO promotions (id, price, expiration_date)
    VALUES ($1, $2, $3)
    ON CONFLICT (id) DO UPDATE SET
        price = excluded.price,
        expiration_date = excluded.expiration_date
"#;

// Plain insert: the table was just wiped, so a duplicate id within one drop
// file is a batch fault, not a merge.
const SQL_INSERT_PROMOTION_AT: &str = r#"
    INSERT INTO promotions (sequence, id, price, expiration_date)
    VALUES ($1, $2, $3, $4)
"#;

const SQL_DELETE_PROMOTIONS: &str = "DELETE FROM promotions";

const SQL_RESET_SEQUENCE: &str = "SELECT setval('promotions_sequence', 1, false)";
const SQL_ADVANCE_SEQUENCE: &str = "SELECT setval('promotions_sequence', $1, true)";

/// Counters describing one file's persistence pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub applied: u64,
    pub failed: u64,
}

/// The persistence policy selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStrategy {
    Upsert,
    ReplaceAll,
}

impl From<IngestMode> for PersistStrategy {
    fn from(mode: IngestMode) -> Self {
        match mode {
            IngestMode::Simple => PersistStrategy::Upsert,
            IngestMode::Immutable => PersistStrategy::ReplaceAll,
        }
    }
}

impl PersistStrategy {
    /// Consume the record stream and durably apply it.
    ///
    /// Blocks until the stream closes. An `Err` from the replace-all path
    /// means the whole batch was rolled back; upsert never fails the batch.
    pub async fn apply(
        self,
        pool: &PgPool,
        records: mpsc::Receiver<Promotion>,
    ) -> Result<ApplyOutcome, sqlx::Error> {
        match self {
            PersistStrategy::Upsert => upsert_stream(pool, records).await,
            PersistStrategy::ReplaceAll => replace_all(pool, records).await,
        }
    }
}

/// Merge each record by id, preserving the sequence of existing rows.
async fn upsert_stream(
    pool: &PgPool,
    mut records: mpsc::Receiver<Promotion>,
) -> Result<ApplyOutcome, sqlx::Error> {
    let mut outcome = ApplyOutcome::default();

    while let Some(promotion) = records.recv().await {
        let result = sqlx::query(SQL_UPSERT_PROMOTION)
            .bind(promotion.id)
            .bind(promotion.price)
            .bind(promotion.expiration_date)
            .execute(pool)
            .await;

        match result {
            Ok(_) => outcome.applied += 1,
            Err(err) => {
                error!(id = %promotion.id, error = %err, "Failed to save promotion");
                outcome.failed += 1;
            },
        }
    }

    Ok(outcome)
}

/// Replace the entire dataset with the stream, sequences restarting at 1.
async fn replace_all(
    pool: &PgPool,
    mut records: mpsc::Receiver<Promotion>,
) -> Result<ApplyOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(SQL_DELETE_PROMOTIONS).execute(&mut *tx).await?;

    let mut outcome = ApplyOutcome::default();
    let mut next_sequence: i64 = 0;

    while let Some(promotion) = records.recv().await {
        next_sequence += 1;
        sqlx::query(SQL_INSERT_PROMOTION_AT)
            .bind(next_sequence)
            .bind(promotion.id)
            .bind(promotion.price)
            .bind(promotion.expiration_date)
            .execute(&mut *tx)
            .await?;
        outcome.applied += 1;
    }

    // setval is not undone by rollback, so the generator is touched only
    // after every insert has succeeded.
    if next_sequence == 0 {
        sqlx::query(SQL_RESET_SEQUENCE).execute(&mut *tx).await?;
    } else {
        sqlx::query(SQL_ADVANCE_SEQUENCE)
            .bind(next_sequence)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(records = outcome.applied, "Storage rewritten");

    Ok(outcome)
}
