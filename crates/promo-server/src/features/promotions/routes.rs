//! HTTP routes for promotion lookup

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::{models::PromotionDto, queries};
use crate::error::AppError;

pub fn promotions_routes() -> Router<PgPool> {
    Router::new().route("/:id", get(get_promotion_handler))
}

/// Look up a promotion by id or by sequence.
///
/// The path parameter is tried as a UUID first; if that fails it is tried as
/// a positional sequence number. Anything else is a bad request.
#[tracing::instrument(skip(pool))]
async fn get_promotion_handler(
    State(pool): State<PgPool>,
    Path(param): Path<String>,
) -> Result<Response, AppError> {
    let promotion = if let Ok(id) = Uuid::parse_str(&param) {
        queries::get_by_id(&pool, id).await?
    } else if let Ok(sequence) = param.parse::<i64>() {
        queries::get_by_sequence(&pool, sequence).await?
    } else {
        return Err(AppError::BadRequest(format!(
            "Failed to parse specified id: {param}"
        )));
    };

    match promotion {
        Some(p) => Ok((StatusCode::OK, Json(PromotionDto::from(&p))).into_response()),
        None => Err(AppError::NotFound(format!(
            "Promotion with id '{param}' not found"
        ))),
    }
}
