//! Marker model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{CollectionKind, RecordId, SyncRecord};

/// A named point dropped on the map.
///
/// `position` is `[latitude, longitude]` in decimal degrees. The position is
/// the marker's significant field for change detection: renames and icon
/// swaps do not count as positional changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Unique identifier, client-generated at creation time
    pub id: RecordId,
    /// User-facing label
    pub name: String,
    /// `[lat, lng]` in decimal degrees
    pub position: [f64; 2],
    /// Optional icon key understood by the viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation timestamp, serialized as ISO-8601
    pub created_at: DateTime<Utc>,
}

impl Marker {
    /// Create a new marker at the given position.
    #[must_use]
    pub fn new(name: impl Into<String>, position: [f64; 2]) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            position,
            icon: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    /// Latitude component of the position.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.position[0]
    }

    /// Longitude component of the position.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.position[1]
    }
}

impl SyncRecord for Marker {
    const COLLECTION: CollectionKind = CollectionKind::Markers;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRecord("marker name must not be empty".into()));
        }
        if !self.position.iter().all(|value| value.is_finite()) {
            return Err(Error::InvalidRecord(format!(
                "marker position must be finite, got {:?}",
                self.position
            )));
        }
        if !(-90.0..=90.0).contains(&self.position[0]) {
            return Err(Error::InvalidRecord(format!(
                "marker latitude out of range: {}",
                self.position[0]
            )));
        }
        Ok(())
    }

    fn differs_from(&self, other: &Self) -> bool {
        self.position != other.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_new_sets_identity_and_time() {
        let marker = Marker::new("Home", [59.33, 18.06]);
        assert_eq!(marker.name, "Home");
        assert_eq!(marker.lat(), 59.33);
        assert_eq!(marker.lng(), 18.06);
        assert!(marker.created_at <= Utc::now());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let marker = Marker::new("   ", [0.0, 0.0]);
        assert!(matches!(marker.validate(), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn validate_rejects_non_finite_position() {
        let marker = Marker::new("Bad", [f64::NAN, 10.0]);
        assert!(marker.validate().is_err());

        let marker = Marker::new("Bad", [10.0, f64::INFINITY]);
        assert!(marker.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_latitude() {
        let marker = Marker::new("North of north", [91.0, 0.0]);
        assert!(marker.validate().is_err());
    }

    #[test]
    fn differs_from_tracks_position_only() {
        let marker = Marker::new("A", [1.0, 2.0]);
        let mut renamed = marker.clone();
        renamed.name = "B".to_string();
        assert!(!marker.differs_from(&renamed));

        let mut moved = marker.clone();
        moved.position = [1.0, 2.5];
        assert!(marker.differs_from(&moved));
    }

    #[test]
    fn created_at_serializes_as_iso8601() {
        let marker = Marker::new("Stamp", [1.0, 2.0]);
        let json = serde_json::to_string(&marker).unwrap();
        // chrono's serde default is RFC 3339, an ISO-8601 profile
        assert!(json.contains("created_at\":\"2"));
        let parsed: Marker = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.created_at, marker.created_at);
    }
}
