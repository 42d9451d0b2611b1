//! Shared API types

pub mod response;
