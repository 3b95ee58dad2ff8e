//! Business logic and port definitions for the Guriri dispatch backend.
//!
//! This crate defines the "ports" (repository, completion, blob-store, and
//! connection traits) that the infrastructure and API layers implement, plus
//! the room registry, assistant gate, and chat session logic built on them.
//! It depends only on `guriri-types` -- never on `guriri-infra` or any
//! database/IO crate.

pub mod assistant;
pub mod chat;
pub mod completion;
pub mod repository;
pub mod room;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
