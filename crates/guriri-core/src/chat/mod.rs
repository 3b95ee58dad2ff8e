//! Chat pipeline: the per-frame service and the per-connection session.

pub mod service;
pub mod session;
