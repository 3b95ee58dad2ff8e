//! Query parameter extractors.

use serde::Deserialize;

use guriri_types::message::DEFAULT_HISTORY_LIMIT;

/// Query parameters for the room history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT
}

/// Query parameters for the assistant-mode toggle.
#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    pub action: Option<String>,
}
