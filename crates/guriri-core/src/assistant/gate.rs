//! Process-wide assistant mode flag and its authorization rule.

use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use guriri_types::assistant::ModeOrigin;
use guriri_types::error::GateError;

/// Holds the `assume_mode` flag. Starts inactive and is never persisted.
///
/// A mode change is authorized when the presented credential equals the
/// configured admin token, or when it originates from the privileged room.
pub struct AssistantGate {
    active: AtomicBool,
    admin_token: SecretString,
    privileged_room: String,
}

impl AssistantGate {
    pub fn new(admin_token: SecretString, privileged_room: impl Into<String>) -> Self {
        Self {
            active: AtomicBool::new(false),
            admin_token,
            privileged_room: privileged_room.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn privileged_room(&self) -> &str {
        &self.privileged_room
    }

    /// Attempt to switch the flag. Returns the previous state on success.
    pub fn set_mode(
        &self,
        active: bool,
        origin: ModeOrigin<'_>,
        credential: Option<&str>,
    ) -> Result<bool, GateError> {
        if let Err(err) = self.authorize(origin, credential) {
            warn!(
                requested = active,
                room = origin.room().unwrap_or("-"),
                actor = origin.actor().unwrap_or("-"),
                "Assistant mode change denied"
            );
            return Err(err);
        }

        let previous = self.active.swap(active, Ordering::SeqCst);
        info!(
            active,
            previous,
            room = origin.room().unwrap_or("-"),
            actor = origin.actor().unwrap_or("-"),
            "Assistant mode set"
        );
        Ok(previous)
    }

    /// Check the authorization rule without touching the flag.
    pub fn authorize(&self, origin: ModeOrigin<'_>, credential: Option<&str>) -> Result<(), GateError> {
        let credential_ok = credential.is_some_and(|c| c == self.admin_token.expose_secret());
        let privileged = origin.room() == Some(self.privileged_room.as_str());
        if credential_ok || privileged {
            Ok(())
        } else {
            Err(GateError::Unauthorized)
        }
    }
}

impl std::fmt::Debug for AssistantGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantGate")
            .field("active", &self.is_active())
            .field("privileged_room", &self.privileged_room)
            .finish_non_exhaustive()
    }
}
