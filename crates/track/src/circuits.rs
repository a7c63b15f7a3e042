//! Built-in circuits.
//!
//! Segment layouts are simplified: each named section of a circuit is a
//! single straight or constant-radius corner. The official length is kept
//! as metadata; the simulated length is always the sum of the segments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simcore::{SegmentType, SimError, SimResult};

use crate::segment::{LapRecord, SegmentDefinition};
use crate::track::{Track, TrackBuilder};

use simcore::SegmentType::{Chicane, FastCorner, MediumCorner, SlowCorner, Straight};

/// `(name, length m, radius m or None for a straight, type)`
type Layout = &'static [(&'static str, f64, Option<f64>, SegmentType)];

const SILVERSTONE: Layout = &[
    ("Abbey", 250.0, Some(100.0), FastCorner),
    ("Farm Straight", 400.0, None, Straight),
    ("Village", 80.0, Some(35.0), Chicane),
    ("The Loop", 150.0, Some(80.0), MediumCorner),
    ("Aintree", 120.0, Some(60.0), MediumCorner),
    ("Wellington Straight", 650.0, None, Straight),
    ("Brooklands", 120.0, Some(90.0), FastCorner),
    ("Luffield", 140.0, Some(40.0), SlowCorner),
    ("Woodcote", 180.0, Some(80.0), MediumCorner),
    ("Copse", 160.0, Some(120.0), FastCorner),
    ("Maggots", 140.0, Some(150.0), FastCorner),
    ("Becketts", 180.0, Some(100.0), FastCorner),
    ("Chapel", 120.0, Some(90.0), FastCorner),
    ("Hangar Straight", 1100.0, None, Straight),
    ("Stowe", 140.0, Some(70.0), MediumCorner),
    ("Vale", 180.0, Some(50.0), MediumCorner),
    ("Club", 160.0, Some(60.0), MediumCorner),
    ("Abbey Approach", 600.0, None, Straight),
    ("Start/Finish", 301.0, None, Straight),
];

const MONACO: Layout = &[
    ("Sainte Devote", 100.0, Some(25.0), SlowCorner),
    ("Beau Rivage", 250.0, None, Straight),
    ("Massenet", 90.0, Some(30.0), SlowCorner),
    ("Casino", 110.0, Some(35.0), SlowCorner),
    ("Mirabeau", 80.0, Some(18.0), SlowCorner),
    ("Station Hairpin", 120.0, Some(15.0), SlowCorner),
    ("Portier", 140.0, Some(40.0), MediumCorner),
    ("Tunnel", 400.0, None, Straight),
    ("Nouvelle Chicane", 100.0, Some(25.0), Chicane),
    ("Tabac", 120.0, Some(35.0), SlowCorner),
    ("Swimming Pool", 180.0, Some(30.0), Chicane),
    ("La Rascasse", 140.0, Some(20.0), SlowCorner),
    ("Anthony Noghes", 110.0, Some(28.0), SlowCorner),
    ("Start Straight", 597.0, None, Straight),
];

const SPA: Layout = &[
    ("La Source", 120.0, Some(30.0), SlowCorner),
    ("Eau Rouge", 180.0, Some(250.0), FastCorner),
    ("Raidillon", 140.0, Some(200.0), FastCorner),
    ("Kemmel Straight", 800.0, None, Straight),
    ("Les Combes", 160.0, Some(50.0), Chicane),
    ("Malmedy", 200.0, Some(100.0), FastCorner),
    ("Rivage", 140.0, Some(45.0), MediumCorner),
    ("Speaker's Corner", 180.0, Some(60.0), MediumCorner),
    ("Bruxelles", 220.0, None, Straight),
    ("Pouhon", 200.0, Some(120.0), FastCorner),
    ("Campus", 450.0, None, Straight),
    ("Stavelot", 160.0, Some(80.0), FastCorner),
    ("Blanchimont", 300.0, Some(200.0), FastCorner),
    ("Chicane", 150.0, Some(40.0), Chicane),
    ("Start Straight", 724.0, None, Straight),
];

/// `(length m, radius m or None)`; negative radii turn left.
const MONZA_STYLE: &[(f64, Option<f64>)] = &[
    (200.0, None),
    (120.0, Some(80.0)),
    (80.0, Some(-70.0)),
    (300.0, None),
    (150.0, Some(200.0)),
    (250.0, None),
    (100.0, Some(45.0)),
    (80.0, Some(-45.0)),
    (400.0, None),
    (120.0, Some(60.0)),
    (100.0, Some(55.0)),
    (350.0, None),
    (90.0, Some(40.0)),
    (80.0, Some(-42.0)),
    (70.0, Some(38.0)),
    (600.0, None),
    (100.0, Some(50.0)),
    (150.0, None),
];

fn from_layout(name: &str, layout: Layout, record: LapRecord) -> SimResult<Track> {
    layout
        .iter()
        .fold(TrackBuilder::new(name), |builder, &(segment, length, radius, segment_type)| {
            let definition = match radius {
                Some(radius) => SegmentDefinition::corner(segment, length, radius),
                None => SegmentDefinition::straight(segment, length),
            };
            builder.segment(definition.with_type(segment_type))
        })
        .record(record)
        .build()
}

pub fn silverstone() -> SimResult<Track> {
    from_layout("Silverstone", SILVERSTONE, LapRecord::new(87.097, "Lewis Hamilton (Mercedes)", 2020))
}

pub fn monaco() -> SimResult<Track> {
    from_layout("Monaco", MONACO, LapRecord::new(70.166, "Lewis Hamilton (Mercedes)", 2019))
}

pub fn spa() -> SimResult<Track> {
    from_layout("Spa-Francorchamps", SPA, LapRecord::new(106.286, "Valtteri Bottas (Mercedes)", 2018))
}

/// Generic high-speed layout of long straights and chicanes, without a
/// record. Section types are derived from the radii.
pub fn monza_style() -> SimResult<Track> {
    MONZA_STYLE
        .iter()
        .enumerate()
        .fold(TrackBuilder::new("Monza Style"), |builder, (i, &(length, radius))| match radius {
            Some(radius) => builder.corner(format!("Turn {}", i + 1), length, radius),
            None => builder.straight(format!("Straight {}", i + 1), length),
        })
        .build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Circuit {
    Silverstone,
    Monaco,
    Spa,
    MonzaStyle,
}

impl Circuit {
    pub const ALL: [Circuit; 4] = [Circuit::Silverstone, Circuit::Monaco, Circuit::Spa, Circuit::MonzaStyle];

    /// Identifier accepted by [`Circuit::from_str`].
    pub fn id(&self) -> &'static str {
        match self {
            Circuit::Silverstone => "silverstone",
            Circuit::Monaco => "monaco",
            Circuit::Spa => "spa",
            Circuit::MonzaStyle => "monza",
        }
    }

    pub fn country(&self) -> &'static str {
        match self {
            Circuit::Silverstone => "United Kingdom",
            Circuit::Monaco => "Monaco",
            Circuit::Spa => "Belgium",
            Circuit::MonzaStyle => "Italy",
        }
    }

    pub fn character(&self) -> &'static str {
        match self {
            Circuit::Silverstone => "High-speed",
            Circuit::Monaco => "Street circuit",
            Circuit::Spa => "Mixed speed",
            Circuit::MonzaStyle => "Low downforce",
        }
    }

    /// Length of the real circuit (m), which the simplified layout only
    /// approximates.
    pub fn official_length(&self) -> Option<f64> {
        match self {
            Circuit::Silverstone => Some(5891.0),
            Circuit::Monaco => Some(3337.0),
            Circuit::Spa => Some(7004.0),
            Circuit::MonzaStyle => None,
        }
    }

    pub fn build(&self) -> SimResult<Track> {
        match self {
            Circuit::Silverstone => silverstone(),
            Circuit::Monaco => monaco(),
            Circuit::Spa => spa(),
            Circuit::MonzaStyle => monza_style(),
        }
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Circuit {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Circuit::ALL
            .into_iter()
            .find(|circuit| circuit.id() == id || (*circuit == Circuit::MonzaStyle && id == "monza_style"))
            .ok_or_else(|| SimError::UnknownTrack(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_all_circuits_build() {
        for circuit in Circuit::ALL {
            let track = circuit.build().unwrap();
            assert!(!track.segments().is_empty());
            assert!(track.total_length() > 0.0);
        }
    }

    #[test]
    fn test_layout_lengths() {
        assert_abs_diff_eq!(silverstone().unwrap().total_length(), 5171.0);
        assert_abs_diff_eq!(monaco().unwrap().total_length(), 2537.0);
        assert_abs_diff_eq!(spa().unwrap().total_length(), 4124.0);
        assert_abs_diff_eq!(monza_style().unwrap().total_length(), 3340.0);
    }

    #[test]
    fn test_records() {
        let silverstone = silverstone().unwrap();
        let record = silverstone.record().unwrap();
        assert_eq!(record.time, 87.097);
        assert_eq!(record.year, 2020);
        assert!(monza_style().unwrap().record().is_none());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("silverstone".parse::<Circuit>(), Ok(Circuit::Silverstone));
        assert_eq!(" Monaco ".parse::<Circuit>(), Ok(Circuit::Monaco));
        assert_eq!("SPA".parse::<Circuit>(), Ok(Circuit::Spa));
        assert_eq!("monza_style".parse::<Circuit>(), Ok(Circuit::MonzaStyle));
        assert_eq!("imola".parse::<Circuit>(), Err(SimError::UnknownTrack("imola".to_string())));
    }

    #[test]
    fn test_id_round_trip() {
        for circuit in Circuit::ALL {
            assert_eq!(circuit.to_string().parse::<Circuit>(), Ok(circuit));
        }
    }

    #[test]
    fn test_monza_types_derived_from_radius() {
        let track = monza_style().unwrap();
        assert_eq!(track.segments()[0].segment_type, Straight);
        assert_eq!(track.segments()[4].segment_type, FastCorner);
        assert_eq!(track.segments()[6].segment_type, MediumCorner);
        assert_eq!(track.segments()[12].segment_type, SlowCorner);
    }
}
