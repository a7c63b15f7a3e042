use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult};

use crate::segment::{LapRecord, Segment, SegmentDefinition};

/// Tolerance when checking that explicitly placed segments line up (m).
const CONTIGUITY_TOLERANCE: f64 = 1e-6;

/// A closed circuit: non-empty, ordered, contiguous segments starting at 0.
///
/// Only [`TrackBuilder`], [`Track::from_segments`] and
/// [`Track::from_definition`] construct one, so every `Track` satisfies the
/// layout invariants and `total_length` is always the sum of the segment
/// lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    name: String,
    segments: Vec<Segment>,
    total_length: f64,
    record: Option<LapRecord>,
}

impl Track {
    pub fn builder(name: impl Into<String>) -> TrackBuilder {
        TrackBuilder::new(name)
    }

    /// Builds a track from already placed segments, e.g. ones read back from
    /// a file. Gaps, overlaps and inconsistent lengths are rejected.
    pub fn from_segments(
        name: impl Into<String>,
        segments: Vec<Segment>,
        record: Option<LapRecord>,
    ) -> SimResult<Self> {
        if segments.is_empty() {
            return Err(SimError::EmptyTrack);
        }

        let mut expected_start = 0.0;
        for (index, segment) in segments.iter().enumerate() {
            segment.validate(index)?;
            if !(segment.start.is_finite() && segment.end.is_finite()) {
                return Err(SimError::InvalidSegment {
                    index,
                    name: segment.name.clone(),
                    reason: format!("start {} and end {} must be finite", segment.start, segment.end),
                });
            }
            if (segment.start - expected_start).abs() > CONTIGUITY_TOLERANCE {
                return Err(SimError::NonContiguous { index, expected: expected_start, found: segment.start });
            }
            if ((segment.end - segment.start) - segment.length).abs() > CONTIGUITY_TOLERANCE {
                return Err(SimError::InvalidSegment {
                    index,
                    name: segment.name.clone(),
                    reason: format!(
                        "end - start = {} does not match length {}",
                        segment.end - segment.start,
                        segment.length
                    ),
                });
            }
            expected_start = segment.end;
        }
        validate_record(record.as_ref())?;

        let total_length = segments.iter().map(|s| s.length).sum();
        Ok(Track { name: name.into(), segments, total_length, record })
    }

    pub fn from_definition(definition: TrackDefinition) -> SimResult<Self> {
        let mut builder = TrackBuilder::new(definition.name);
        for segment in definition.segments {
            builder = builder.segment(segment);
        }
        if let Some(record) = definition.record {
            builder = builder.record(record);
        }
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn record(&self) -> Option<&LapRecord> {
        self.record.as_ref()
    }

    /// Index of the segment whose `[start, end)` contains `distance`.
    /// Distances before the start map to the first segment and distances at
    /// or past the finish map to the last.
    pub fn segment_index_at(&self, distance: f64) -> usize {
        let index = self.segments.partition_point(|segment| segment.end <= distance);
        index.min(self.segments.len() - 1)
    }

    pub fn segment_at(&self, distance: f64) -> &Segment {
        &self.segments[self.segment_index_at(distance)]
    }

    /// Copy of the track as an editable definition.
    pub fn to_definition(&self) -> TrackDefinition {
        TrackDefinition {
            name: self.name.clone(),
            record: self.record.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentDefinition {
                    name: s.name.clone(),
                    length: s.length,
                    geometry: s.geometry,
                    segment_type: Some(s.segment_type),
                    speed_limit: s.speed_limit,
                })
                .collect(),
        }
    }
}

fn validate_record(record: Option<&LapRecord>) -> SimResult<()> {
    match record {
        Some(record) if !(record.time.is_finite() && record.time > 0.0) => Err(SimError::InvalidParameter {
            name: "record.time",
            value: record.time,
            reason: "must be finite and > 0",
        }),
        _ => Ok(()),
    }
}

/// Appends segments end to end; the running total is the only source of
/// segment placement.
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    name: String,
    segments: Vec<Segment>,
    cursor: f64,
    record: Option<LapRecord>,
}

impl TrackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        TrackBuilder { name: name.into(), segments: Vec::new(), cursor: 0.0, record: None }
    }

    pub fn segment(mut self, definition: SegmentDefinition) -> Self {
        let segment = definition.place(self.cursor);
        self.cursor = segment.end;
        self.segments.push(segment);
        self
    }

    pub fn straight(self, name: impl Into<String>, length: f64) -> Self {
        self.segment(SegmentDefinition::straight(name, length))
    }

    pub fn corner(self, name: impl Into<String>, length: f64, radius: f64) -> Self {
        self.segment(SegmentDefinition::corner(name, length, radius))
    }

    pub fn record(mut self, record: LapRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn build(self) -> SimResult<Track> {
        if self.segments.is_empty() {
            return Err(SimError::EmptyTrack);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            segment.validate(index)?;
        }
        validate_record(self.record.as_ref())?;

        debug!("built track '{}': {} segments, {:.0} m", self.name, self.segments.len(), self.cursor);
        Ok(Track { name: self.name, segments: self.segments, total_length: self.cursor, record: self.record })
    }
}

/// Serializable description of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<LapRecord>,
    pub segments: Vec<SegmentDefinition>,
}
