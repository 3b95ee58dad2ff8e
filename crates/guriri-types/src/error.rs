use thiserror::Error;

/// Errors from repository operations (used by trait definitions in guriri-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// A send or receive failure on a single room connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),
}

/// Rejection from the assistant gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("unauthorized: admin credential required")]
    Unauthorized,
}

/// Errors from the text-completion backend.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("endpoint {endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse completion response: {0}")]
    Deserialization(String),

    #[error("all completion endpoints failed; last error: {0}")]
    Exhausted(String),
}

/// Errors from the live-doc blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no live docs found for '{0}'")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
