//! HTTP and WebSocket request handlers.

pub mod admin;
pub mod docs;
pub mod health;
pub mod messages;
pub mod orders;
pub mod uploads;
pub mod ws;
