//! Assistant mode ("Schumacher") notification payloads.

use serde::{Deserialize, Serialize};

/// Payload of a `schumacher_mode` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChange {
    pub assume: bool,
    /// Sender that issued the in-band command; absent for HTTP toggles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
}

/// Where a mode-change request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOrigin<'a> {
    /// The admin HTTP endpoint. Always requires the credential.
    Http,
    /// An in-band `/thor` command sent in the named room by the named sender.
    Room { room: &'a str, sender: &'a str },
}

impl ModeOrigin<'_> {
    /// Room the request came from, if any.
    pub fn room(&self) -> Option<&str> {
        match self {
            ModeOrigin::Http => None,
            ModeOrigin::Room { room, .. } => Some(room),
        }
    }

    /// Actor recorded in the `schumacher_mode` notification.
    pub fn actor(&self) -> Option<&str> {
        match self {
            ModeOrigin::Http => None,
            ModeOrigin::Room { sender, .. } => Some(sender),
        }
    }
}
