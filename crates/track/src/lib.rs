//! Circuit description: ordered, contiguous segments with lookup by
//! distance, and the built-in circuits.

pub mod circuits;
pub mod segment;
mod track;

pub use circuits::Circuit;
pub use segment::{LapRecord, Segment, SegmentDefinition};
pub use track::{Track, TrackBuilder, TrackDefinition};
