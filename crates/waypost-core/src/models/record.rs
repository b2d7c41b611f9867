//! Record identity and the trait every syncable model implements.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A unique identifier for a record, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new unique record ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which collection a record type belongs to.
///
/// Selects both the local storage key and the remote API path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Markers,
    Drawings,
}

impl CollectionKind {
    /// Local storage key for the serialized collection.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Markers => "savedMarkers",
            Self::Drawings => "savedDrawings",
        }
    }

    /// Path segment under `/api/` on the remote service.
    #[must_use]
    pub const fn remote_path(self) -> &'static str {
        match self {
            Self::Markers => "markers",
            Self::Drawings => "drawings",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.remote_path())
    }
}

/// A uniquely-identified, locally-durable, remotely-syncable record.
///
/// Two records with the same [`RecordId`] are the same logical entity; the
/// most recently written version wins when collections are merged.
pub trait SyncRecord: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The collection this record type lives in.
    const COLLECTION: CollectionKind;

    /// Stable unique identifier.
    fn id(&self) -> &RecordId;

    /// User-facing display name.
    fn name(&self) -> &str;

    /// Replace the display name (rename is a local-only mutation).
    fn set_name(&mut self, name: String);

    /// Reject malformed records before any write reaches storage.
    fn validate(&self) -> Result<()>;

    /// Compare the significant fields used for change detection.
    ///
    /// Returns `true` when the two versions of the same logical record
    /// differ in a way that should trigger a state update.
    fn differs_from(&self, other: &Self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_unique() {
        let id1 = RecordId::new();
        let id2 = RecordId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn record_id_parse_roundtrip() {
        let id = RecordId::new();
        let parsed: RecordId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn collection_kind_keys() {
        assert_eq!(CollectionKind::Markers.storage_key(), "savedMarkers");
        assert_eq!(CollectionKind::Drawings.storage_key(), "savedDrawings");
        assert_eq!(CollectionKind::Markers.remote_path(), "markers");
        assert_eq!(CollectionKind::Drawings.remote_path(), "drawings");
    }
}
