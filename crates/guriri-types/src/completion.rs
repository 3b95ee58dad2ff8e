//! Text-completion request type shared by the chat service and providers.

use serde::{Deserialize, Serialize};

/// A single-prompt completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}
