//! Persisted chat records.
//!
//! Every inbound chat line, every assistant reply, and every live-doc upload
//! is stored as a [`ChatRecord`]. Records are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sender name used for automated assistant replies.
pub const ASSISTANT_SENDER: &str = "THOR";

/// Sender name used when an inbound frame does not identify its author.
pub const UNKNOWN_SENDER: &str = "unknown";

/// Default number of records returned by a history query.
pub const DEFAULT_HISTORY_LIMIT: i64 = 200;

/// A stored chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Opaque unique id (simple-format UUID v4).
    pub id: String,
    pub room: String,
    pub sender: String,
    pub text: String,
    /// Opaque structured metadata; `null` when the stored column was empty.
    pub meta: serde_json::Value,
    pub ts: DateTime<Utc>,
}

impl ChatRecord {
    /// Create a new record stamped with a fresh id and the current time.
    pub fn new(
        room: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
        meta: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            room: room.into(),
            sender: sender.into(),
            text: text.into(),
            meta,
            ts: Utc::now(),
        }
    }
}
