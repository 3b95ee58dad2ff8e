//! HTTP and WebSocket layer for Guriri.
//!
//! Axum router with order intake, live-doc upload/download, admin assistant
//! toggle, room history, health, and the per-room WebSocket chat endpoint.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod ws_connection;
