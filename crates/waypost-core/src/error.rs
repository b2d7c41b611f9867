//! Error types for waypost-core

use thiserror::Error;

/// Result type alias using waypost-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in waypost-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local storage contained unreadable data; recovered internally as an
    /// empty collection and logged, never surfaced to callers of the store.
    #[error("Storage read error: {0}")]
    StorageRead(String),

    /// Local durable write failed (quota, permissions). Surfaced to the
    /// caller; the mutation is not retried automatically.
    #[error("Storage write error: {0}")]
    StorageWrite(String),

    /// Remote service unreachable: network failure, timeout, non-2xx status,
    /// or a body that did not parse. Best-effort sync logs and swallows this.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Caller-supplied record failed validation; rejected before any write.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
