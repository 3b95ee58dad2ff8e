//! Blob storage port for courier live-doc uploads.

pub mod live_doc_store;
