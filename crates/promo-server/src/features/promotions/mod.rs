//! Promotion lookup feature
//!
//! Read-side access to stored promotions, by id or by positional sequence.

pub mod models;
pub mod queries;
pub mod routes;

pub use models::PromotionDto;
pub use routes::promotions_routes;
