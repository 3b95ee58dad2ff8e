//! SQLite persistence via sqlx with split reader/writer pools.

pub mod message;
pub mod order;
pub mod pool;
