//! Filesystem-backed blob storage.

pub mod filesystem;
