//! Drawing model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::record::{CollectionKind, RecordId, SyncRecord};

/// Geometry kind of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    Polyline,
    Polygon,
    Rectangle,
    Circle,
}

impl DrawingKind {
    /// Minimum number of points a well-formed drawing of this kind carries.
    ///
    /// Rectangles are stored as two opposite corners, circles as center plus
    /// one edge point.
    #[must_use]
    pub const fn min_points(self) -> usize {
        match self {
            Self::Polyline | Self::Rectangle | Self::Circle => 2,
            Self::Polygon => 3,
        }
    }
}

/// A shape drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Unique identifier, client-generated at creation time
    pub id: RecordId,
    /// User-facing label
    pub name: String,
    /// Geometry kind
    pub kind: DrawingKind,
    /// Vertices as `[lat, lng]` pairs; interpretation depends on `kind`
    pub points: Vec<[f64; 2]>,
    /// Optional stroke/fill color (CSS color string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Creation timestamp, serialized as ISO-8601
    pub created_at: DateTime<Utc>,
}

impl Drawing {
    /// Create a new drawing from its vertices.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DrawingKind, points: Vec<[f64; 2]>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            kind,
            points,
            color: None,
            created_at: Utc::now(),
        }
    }
}

impl SyncRecord for Drawing {
    const COLLECTION: CollectionKind = CollectionKind::Drawings;

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
            return Err(Error::InvalidRecord(
                "drawing name must not be empty".into(),
            ));
        }
        let minimum = self.kind.min_points();
        if self.points.len() < minimum {
            return Err(Error::InvalidRecord(format!(
                "{:?} drawing needs at least {minimum} points, got {}",
                self.kind,
                self.points.len()
            )));
        }
        if !self
            .points
            .iter()
            .all(|point| point.iter().all(|value| value.is_finite()))
        {
            return Err(Error::InvalidRecord(
                "drawing points must all be finite".into(),
            ));
        }
        Ok(())
    }

    fn differs_from(&self, other: &Self) -> bool {
        self.kind != other.kind || self.points != other.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_enforces_min_points_per_kind() {
        let line = Drawing::new("Route", DrawingKind::Polyline, vec![[0.0, 0.0]]);
        assert!(line.validate().is_err());

        let line = Drawing::new("Route", DrawingKind::Polyline, vec![[0.0, 0.0], [1.0, 1.0]]);
        assert!(line.validate().is_ok());

        let polygon = Drawing::new("Area", DrawingKind::Polygon, vec![[0.0, 0.0], [1.0, 1.0]]);
        assert!(polygon.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_finite_points() {
        let drawing = Drawing::new(
            "Bad",
            DrawingKind::Polyline,
            vec![[0.0, 0.0], [f64::NAN, 1.0]],
        );
        assert!(matches!(drawing.validate(), Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn differs_from_tracks_geometry() {
        let drawing = Drawing::new("A", DrawingKind::Polyline, vec![[0.0, 0.0], [1.0, 1.0]]);

        let mut renamed = drawing.clone();
        renamed.name = "B".to_string();
        assert!(!drawing.differs_from(&renamed));

        let mut reshaped = drawing.clone();
        reshaped.points.push([2.0, 2.0]);
        assert!(drawing.differs_from(&reshaped));

        let mut rekinded = drawing.clone();
        rekinded.kind = DrawingKind::Polygon;
        assert!(drawing.differs_from(&rekinded));
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&DrawingKind::Rectangle).unwrap();
        assert_eq!(json, "\"rectangle\"");
    }
}
