//! Completion backends.

pub mod ollama;
