use serde::{Deserialize, Serialize};
use simcore::{SegmentGeometry, SegmentType, SimError, SimResult};

/// Corners tighter than this are slow corners (m).
pub const SLOW_CORNER_RADIUS: f64 = 45.0;
/// Corners tighter than this (and not slow) are medium corners (m).
pub const MEDIUM_CORNER_RADIUS: f64 = 90.0;

/// Type tag for a segment defined only by its geometry.
pub fn classify(geometry: SegmentGeometry) -> SegmentType {
    match geometry.radius() {
        None => SegmentType::Straight,
        Some(r) if r < SLOW_CORNER_RADIUS => SegmentType::SlowCorner,
        Some(r) if r < MEDIUM_CORNER_RADIUS => SegmentType::MediumCorner,
        Some(_) => SegmentType::FastCorner,
    }
}

/// Fastest lap on record, kept for comparison only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// s
    pub time: f64,
    pub holder: String,
    pub year: u16,
}

impl LapRecord {
    pub fn new(time: f64, holder: impl Into<String>, year: u16) -> Self {
        LapRecord { time, holder: holder.into(), year }
    }
}

/// A placed segment covering `[start, end)` along the racing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub length: f64,
    pub geometry: SegmentGeometry,
    pub segment_type: SegmentType,
    /// Hard cap on speed through the segment (m/s), on top of the grip limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_limit: Option<f64>,
}

impl Segment {
    pub fn contains(&self, distance: f64) -> bool {
        self.start <= distance && distance < self.end
    }

    pub fn is_straight(&self) -> bool {
        self.geometry.is_straight()
    }

    pub(crate) fn validate(&self, index: usize) -> SimResult<()> {
        let invalid = |reason: String| SimError::InvalidSegment { index, name: self.name.clone(), reason };

        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(invalid(format!("length must be finite and > 0, got {}", self.length)));
        }
        if let SegmentGeometry::Corner { radius } = self.geometry {
            if !(radius.is_finite() && radius != 0.0) {
                return Err(invalid(format!("corner radius must be finite and non-zero, got {}", radius)));
            }
        }
        if let Some(limit) = self.speed_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(invalid(format!("speed limit must be finite and > 0, got {}", limit)));
            }
        }
        Ok(())
    }
}

/// Unplaced segment, as written in a track file. Placement along the lap is
/// derived from the order of definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    pub name: String,
    pub length: f64,
    pub geometry: SegmentGeometry,
    /// Derived from the radius when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_type: Option<SegmentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_limit: Option<f64>,
}

impl SegmentDefinition {
    pub fn straight(name: impl Into<String>, length: f64) -> Self {
        SegmentDefinition {
            name: name.into(),
            length,
            geometry: SegmentGeometry::Straight,
            segment_type: Some(SegmentType::Straight),
            speed_limit: None,
        }
    }

    pub fn corner(name: impl Into<String>, length: f64, radius: f64) -> Self {
        SegmentDefinition {
            name: name.into(),
            length,
            geometry: SegmentGeometry::corner(radius),
            segment_type: None,
            speed_limit: None,
        }
    }

    pub fn with_type(mut self, segment_type: SegmentType) -> Self {
        self.segment_type = Some(segment_type);
        self
    }

    pub fn with_speed_limit(mut self, limit: f64) -> Self {
        self.speed_limit = Some(limit);
        self
    }

    pub(crate) fn place(self, start: f64) -> Segment {
        Segment {
            start,
            end: start + self.length,
            length: self.length,
            segment_type: self.segment_type.unwrap_or_else(|| classify(self.geometry)),
            geometry: self.geometry,
            speed_limit: self.speed_limit,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_radius() {
        assert_eq!(classify(SegmentGeometry::Straight), SegmentType::Straight);
        assert_eq!(classify(SegmentGeometry::corner(25.0)), SegmentType::SlowCorner);
        assert_eq!(classify(SegmentGeometry::corner(-30.0)), SegmentType::SlowCorner);
        assert_eq!(classify(SegmentGeometry::corner(60.0)), SegmentType::MediumCorner);
        assert_eq!(classify(SegmentGeometry::corner(150.0)), SegmentType::FastCorner);
    }

    #[test]
    fn test_place_keeps_explicit_type() {
        let segment = SegmentDefinition::corner("Village", 80.0, 35.0).with_type(SegmentType::Chicane).place(1000.0);
        assert_eq!(segment.segment_type, SegmentType::Chicane);
        assert_eq!(segment.start, 1000.0);
        assert_eq!(segment.end, 1080.0);
        assert!(segment.contains(1000.0));
        assert!(!segment.contains(1080.0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SegmentDefinition::straight("s", 0.0).place(0.0).validate(0).is_err());
        assert!(SegmentDefinition::straight("s", f64::NAN).place(0.0).validate(0).is_err());
        assert!(SegmentDefinition::corner("c", 100.0, 0.0).place(0.0).validate(0).is_err());
        assert!(SegmentDefinition::corner("c", 100.0, f64::INFINITY).place(0.0).validate(0).is_err());
        assert!(SegmentDefinition::straight("s", 100.0).with_speed_limit(-1.0).place(0.0).validate(0).is_err());
        assert!(SegmentDefinition::corner("c", 100.0, -45.0).place(0.0).validate(0).is_ok());
    }

    #[test]
    fn test_definition_from_json() {
        let json = r#"{"name":"Copse","length":160.0,"geometry":{"kind":"corner","radius":120.0}}"#;
        let definition: SegmentDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.geometry.radius(), Some(120.0));
        assert_eq!(definition.place(0.0).segment_type, SegmentType::FastCorner);
    }
}
