//! Infrastructure layer for Guriri.
//!
//! Contains implementations of the ports defined in `guriri-core`: SQLite
//! storage for orders and chat records, the Ollama HTTP completion client,
//! the filesystem live-doc store, and the layered configuration loader.

pub mod completion;
pub mod config;
pub mod sqlite;
pub mod storage;
