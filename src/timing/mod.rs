//! Timing Point Model & Query Engine
//!
//! Timing points are control points fixing tempo, volume and slider
//! velocity from their anchor time onward until superseded. Two kinds
//! exist on the wire, both using the 8-field record
//! `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited,effects`:
//!
//! - Uninherited ("red line"): `beatLength` is the real duration of one
//!   beat in milliseconds; tempo = 60000 / beatLength.
//! - Inherited ("green line"): `beatLength` is a *negative* value whose
//!   magnitude encodes a slider-velocity multiplier as `-100 / value`; the
//!   point never carries its own tempo.
//!
//! The list keeps its file order and is never re-sorted; temporal queries
//! scan it front to back, so under equal anchor times the later entry wins.

use crate::format::{format_decimal, format_time};
use crate::{BeatmapError, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Section name used in parse errors
const SECTION: &str = "TimingPoints";

/// Default BPM when a chart has no uninherited timing point
pub const DEFAULT_BPM: f64 = 120.0;

/// Default volume when a chart has no timing points
pub const DEFAULT_VOLUME: u32 = 100;

bitflags! {
    /// Generic per-point effect flags (field 8 of the record)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Effects: u32 {
        /// Kiai time is enabled from this point onward
        const KIAI = 1;
        /// The first barline is omitted (taiko/mania)
        const OMIT_FIRST_BARLINE = 8;
    }
}

/// A tempo-defining control point ("red line")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UninheritedPoint {
    /// Anchor time in milliseconds
    pub time: f64,
    /// Duration of one beat in milliseconds
    pub beat_length: f64,
    /// Beats per measure
    pub meter: u32,
    /// Default sample set id for hit objects
    pub sample_set: u32,
    /// Custom sample index (0 = default hitsounds)
    pub sample_index: u32,
    /// Volume percentage (0-100)
    pub volume: u32,
    /// Effect flags
    pub effects: Effects,
}

impl UninheritedPoint {
    /// Tempo of this point in beats per minute.
    pub fn bpm(&self) -> f64 {
        60_000.0 / self.beat_length
    }
}

/// A velocity-scaling control point ("green line")
///
/// Carries no tempo of its own; its effective tempo is always that of the
/// nearest preceding uninherited point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InheritedPoint {
    /// Anchor time in milliseconds
    pub time: f64,
    /// The raw negative wire value; the slider-velocity multiplier is
    /// `-100 / value`
    pub value: f64,
    /// Beats per measure carried through from the wire; the point defines
    /// no tempo of its own, but the field round-trips
    pub meter: u32,
    /// Default sample set id for hit objects
    pub sample_set: u32,
    /// Custom sample index (0 = default hitsounds)
    pub sample_index: u32,
    /// Volume percentage (0-100)
    pub volume: u32,
    /// Effect flags
    pub effects: Effects,
}

impl InheritedPoint {
    /// Slider-velocity multiplier encoded by this point, unclamped.
    pub fn velocity_multiplier(&self) -> f64 {
        -100.0 / self.value
    }
}

/// A timing point of either kind, classified by the wire `uninherited` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimingPoint {
    /// Tempo-defining point
    Uninherited(UninheritedPoint),
    /// Velocity-scaling point
    Inherited(InheritedPoint),
}

impl TimingPoint {
    /// Anchor time in milliseconds.
    pub fn time(&self) -> f64 {
        match self {
            TimingPoint::Uninherited(p) => p.time,
            TimingPoint::Inherited(p) => p.time,
        }
    }

    /// Volume percentage carried by the point.
    pub fn volume(&self) -> u32 {
        match self {
            TimingPoint::Uninherited(p) => p.volume,
            TimingPoint::Inherited(p) => p.volume,
        }
    }

    /// Decode one 8-field record.
    ///
    /// Trailing fields may be omitted on truncated lines and default to
    /// meter 4, sample ids 0, volume 100 and no effects; a missing
    /// `uninherited` flag is inferred from the sign of the second field.
    /// Fails only when the time or beat-length field is not a valid number.
    pub fn decode(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();

        let time: f64 = fields
            .first()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| BeatmapError::field(SECTION, 0, line))?;
        let beat_length: f64 = fields
            .get(1)
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| BeatmapError::field(SECTION, 1, line))?;

        let meter = parse_or(&fields, 2, 4);
        let sample_set = parse_or(&fields, 3, 0);
        let sample_index = parse_or(&fields, 4, 0);
        let volume = parse_or(&fields, 5, DEFAULT_VOLUME);
        let uninherited = match fields.get(6) {
            Some(s) => s.trim() != "0",
            None => beat_length >= 0.0,
        };
        let effects = Effects::from_bits_truncate(parse_or(&fields, 7, 0));

        if uninherited {
            Ok(TimingPoint::Uninherited(UninheritedPoint {
                time,
                beat_length,
                meter,
                sample_set,
                sample_index,
                volume,
                effects,
            }))
        } else {
            Ok(TimingPoint::Inherited(InheritedPoint {
                time,
                value: beat_length,
                meter,
                sample_set,
                sample_index,
                volume,
                effects,
            }))
        }
    }

    /// Encode the point back into its 8-field record.
    pub fn encode(&self) -> String {
        match self {
            TimingPoint::Uninherited(p) => format!(
                "{},{},{},{},{},{},1,{}",
                format_time(p.time),
                format_decimal(p.beat_length),
                p.meter,
                p.sample_set,
                p.sample_index,
                p.volume,
                p.effects.bits()
            ),
            TimingPoint::Inherited(p) => format!(
                "{},{},{},{},{},{},0,{}",
                format_time(p.time),
                format_decimal(p.value),
                p.meter,
                p.sample_set,
                p.sample_index,
                p.volume,
                p.effects.bits()
            ),
        }
    }
}

/// Parse field `index` as a `u32`, defaulting on absence or bad digits.
fn parse_or(fields: &[&str], index: usize, default: u32) -> u32 {
    fields
        .get(index)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// The `[TimingPoints]` section: an ordered list of control points.
///
/// Order is the file order; the engine never re-sorts. An absent section is
/// represented as `None` at the beatmap level, distinct from an empty one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimingPointsSection {
    /// Control points in file order
    pub points: Vec<TimingPoint>,
}

impl TimingPointsSection {
    /// Decode the section's lines, one record per line.
    pub fn decode(lines: &[String]) -> Result<Self> {
        let points = lines
            .iter()
            .map(|line| TimingPoint::decode(line))
            .collect::<Result<Vec<_>>>()?;
        Ok(TimingPointsSection { points })
    }

    /// Encode the section, one record per line, each newline-terminated.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for point in &self.points {
            out.push_str(&point.encode());
            out.push('\n');
        }
        out
    }

    /// The controlling point of either kind at `time`: the last point whose
    /// anchor time is <= `time` in file order, else the first point of the
    /// list. Under equal anchor times the later entry wins.
    pub fn control_point_at(&self, time: f64) -> Option<&TimingPoint> {
        let mut best = self.points.first();
        for point in &self.points {
            if point.time() <= time {
                best = Some(point);
            }
        }
        best
    }

    /// The uninherited point in effect at `time`.
    ///
    /// The first uninherited point applies retroactively before its anchor,
    /// so queries before the first control point still get a tempo.
    pub fn uninherited_at(&self, time: f64) -> Option<&UninheritedPoint> {
        let mut best: Option<&UninheritedPoint> = None;
        for point in &self.points {
            if let TimingPoint::Uninherited(p) = point {
                if best.is_none() || p.time <= time {
                    best = Some(p);
                }
            }
        }
        best
    }

    /// The inherited point controlling slider velocity at `time`, if the
    /// closest preceding point of either kind is a green line.
    pub fn inherited_at(&self, time: f64) -> Option<&InheritedPoint> {
        match self.control_point_at(time) {
            Some(TimingPoint::Inherited(p)) => Some(p),
            _ => None,
        }
    }

    /// Effective tempo at `time`, defaulting to 120 BPM without points.
    pub fn bpm_at(&self, time: f64) -> f64 {
        self.uninherited_at(time)
            .map(UninheritedPoint::bpm)
            .unwrap_or(DEFAULT_BPM)
    }

    /// Duration of one beat in milliseconds at `time`.
    pub fn beat_length_at(&self, time: f64) -> f64 {
        self.uninherited_at(time)
            .map(|p| p.beat_length)
            .unwrap_or(60_000.0 / DEFAULT_BPM)
    }

    /// Effective volume at `time`, defaulting to 100 without points.
    pub fn volume_at(&self, time: f64) -> u32 {
        self.control_point_at(time)
            .map(TimingPoint::volume)
            .unwrap_or(DEFAULT_VOLUME)
    }

    /// Slider-velocity multiplier at `time`: 1.0 when the controlling point
    /// is uninherited or absent, else `-100 / value` clamped to 0.1..=10.0.
    pub fn velocity_multiplier_at(&self, time: f64) -> f64 {
        self.inherited_at(time)
            .map(|p| p.velocity_multiplier().clamp(0.1, 10.0))
            .unwrap_or(1.0)
    }
}
