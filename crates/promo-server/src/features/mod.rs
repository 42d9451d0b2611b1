//! Feature modules implementing the promostore API
//!
//! Each feature is a vertical slice with its own queries, DTOs, and route
//! definitions. The read side is intentionally thin: the store is written by
//! the ingestion pipeline, never through HTTP.

pub mod promotions;

use axum::Router;
use sqlx::PgPool;

/// Creates the main API router with all feature routes mounted
pub fn router(db: PgPool) -> Router<()> {
    Router::new().nest("/promotions", promotions::promotions_routes().with_state(db))
}
