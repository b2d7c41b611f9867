use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] waypost_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Record name cannot be empty")]
    EmptyName,
    #[error("Record ID cannot be empty")]
    EmptyRecordId,
    #[error("Invalid point '{0}': expected LAT,LNG")]
    InvalidPoint(String),
    #[error("Record not found for id/prefix: {0}")]
    RecordNotFound(String),
    #[error("{0}")]
    AmbiguousRecordId(String),
    #[error("Remote is not configured. Pass --api-url or set WAYPOST_API_URL.")]
    RemoteNotConfigured,
}
