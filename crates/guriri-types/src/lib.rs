//! Shared domain types for the Guriri dispatch backend.
//!
//! Orders, chat records, wire events, inbound frames, live-doc metadata,
//! configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror,
//! and secrecy for the admin credential.

pub mod assistant;
pub mod completion;
pub mod config;
pub mod error;
pub mod event;
pub mod inbound;
pub mod live_doc;
pub mod message;
pub mod order;
pub mod room;
