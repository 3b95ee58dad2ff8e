//! Room and connection identity.
//!
//! A room is a plain string key (an order id, or the dispatch room name).
//! It is never stored; it exists only while connections reference it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Name of the dispatch room whose members may toggle assistant mode
/// without presenting the admin credential.
pub const DEFAULT_PRIVILEGED_ROOM: &str = "central";

/// Unique identifier for a live room connection, wrapping a UUID v7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new ConnectionId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
