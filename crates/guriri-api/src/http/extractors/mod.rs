//! Custom axum extractors.

pub mod admin;
pub mod query;
