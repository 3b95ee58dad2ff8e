//! Persistence ports.
//!
//! Implementations live in guriri-infra (SQLite via sqlx).

pub mod message;
pub mod order;
