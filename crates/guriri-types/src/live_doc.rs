//! Live Doc types: photos uploaded by couriers as proof of delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An upload received from a courier, before it is stored.
#[derive(Debug, Clone)]
pub struct LiveDocUpload {
    pub order_id: String,
    pub motoboy: String,
    /// File name as supplied by the client (may be empty or unsafe).
    pub file_name: String,
    pub content: Vec<u8>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Metadata describing a stored live doc.
///
/// Broadcast as the payload of `live_doc_uploaded` and stored as the `meta`
/// of the accompanying chat record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveDocMeta {
    pub order_id: String,
    pub motoboy: String,
    pub path: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub ts: DateTime<Utc>,
}

/// A file read back from the live-doc store.
#[derive(Debug, Clone)]
pub struct LiveDocFile {
    pub file_name: String,
    pub content: Vec<u8>,
}
