//! Hit Object Model & Codec
//!
//! A hit object is one comma-separated record:
//! `x,y,time,type,hitSound,<variant fields...>,hitSample`
//!
//! The 4th field is a bit-packed type byte discriminating four variants and
//! carrying two combo fields. The bit positions are format contract and are
//! reproduced exactly on encode:
//! - bit 0: circle
//! - bit 1: slider
//! - bit 2: starts a new visual combo
//! - bit 3: spinner
//! - bits 4-6: combo-colour skip offset (3-bit value)
//! - bit 7: hold (mania long press)

pub mod hit_sample;
pub mod slider;

pub use hit_sample::HitSample;
pub use slider::{CurveKind, SliderData};

use crate::format::{format_coord, format_time};
use crate::timing::TimingPointsSection;
use crate::{BeatmapError, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Section name used in parse errors
pub(crate) const SECTION: &str = "HitObjects";

// Type byte layout
const TYPE_CIRCLE: u32 = 1;
const TYPE_SLIDER: u32 = 1 << 1;
const TYPE_NEW_COMBO: u32 = 1 << 2;
const TYPE_SPINNER: u32 = 1 << 3;
const TYPE_HOLD: u32 = 1 << 7;
const COMBO_OFFSET_SHIFT: u32 = 4;
const COMBO_OFFSET_MASK: u32 = 0b111;

bitflags! {
    /// Hit-sound bitmask (field 5), any combination of the four sounds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct HitSounds: u32 {
        /// Normal hit sound
        const NORMAL = 1;
        /// Whistle
        const WHISTLE = 2;
        /// Finish (cymbal)
        const FINISH = 4;
        /// Clap
        const CLAP = 8;
    }
}

/// A 2D playfield position in osu!-pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

/// Context a hit-object decode needs from the rest of the document.
///
/// Sliders interpret their length relative to the controlling timing
/// point's velocity multiplier and the difficulty's base slider multiplier,
/// so timing points must be decoded first.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// The decoded timing-point engine, when the section exists
    pub timing: Option<&'a TimingPointsSection>,
    /// Base slider multiplier from the difficulty section
    pub slider_multiplier: f64,
    /// Fail on mismatched per-edge override counts instead of repairing
    pub strict_edge_lists: bool,
}

impl Default for DecodeContext<'_> {
    fn default() -> Self {
        DecodeContext {
            timing: None,
            slider_multiplier: 1.4,
            strict_edge_lists: false,
        }
    }
}

/// Variant-specific payload of a hit object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HitObjectKind {
    /// A tap circle; nothing beyond the common payload
    Circle,
    /// A traced path with repeats
    Slider(SliderData),
    /// A spin held until `end_time`
    Spinner {
        /// End time in milliseconds
        end_time: f64,
    },
    /// A mania long press held until `end_time`
    Hold {
        /// End time in milliseconds
        end_time: f64,
    },
}

/// One placed gameplay element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    /// Playfield position
    pub position: Position,
    /// Start time in milliseconds
    pub time: f64,
    /// Hit-sound flags
    pub hit_sounds: HitSounds,
    /// Whether this object starts a new visual combo
    pub new_combo: bool,
    /// 3-bit combo-colour skip offset
    pub combo_offset: u32,
    /// Sample override descriptor
    pub sample: HitSample,
    /// Variant payload
    pub kind: HitObjectKind,
}

impl HitObject {
    /// Decode one record into the variant selected by its type byte.
    ///
    /// Fails only when a structurally required field (coordinates, time,
    /// type) is missing or non-numeric; optional trailing fields default
    /// silently.
    pub fn decode(line: &str, ctx: &DecodeContext<'_>) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();

        let x: f32 = require(&fields, 0, line)?;
        let y: f32 = require(&fields, 1, line)?;
        let time: f64 = require(&fields, 2, line)?;
        let type_bits: u32 = require(&fields, 3, line)?;

        let hit_sounds = HitSounds::from_bits_truncate(
            fields
                .get(4)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        );
        let new_combo = type_bits & TYPE_NEW_COMBO != 0;
        let combo_offset = (type_bits >> COMBO_OFFSET_SHIFT) & COMBO_OFFSET_MASK;

        let (kind, sample) = if type_bits & TYPE_SLIDER != 0 {
            let (data, sample) = SliderData::decode(&fields, line, time, ctx)?;
            (HitObjectKind::Slider(data), sample)
        } else if type_bits & TYPE_SPINNER != 0 {
            let end_time = fields
                .get(5)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(time);
            (HitObjectKind::Spinner { end_time }, trailing_sample(&fields, 6))
        } else if type_bits & TYPE_HOLD != 0 {
            decode_hold(&fields, time)
        } else {
            // circle, also the fallback for a zero discriminant
            (HitObjectKind::Circle, trailing_sample(&fields, 5))
        };

        Ok(HitObject {
            position: Position { x, y },
            time,
            hit_sounds,
            new_combo,
            combo_offset,
            sample,
            kind,
        })
    }

    /// Re-derive the wire type byte from the variant and combo fields.
    pub fn type_bits(&self) -> u32 {
        let mut bits = match &self.kind {
            HitObjectKind::Circle => TYPE_CIRCLE,
            HitObjectKind::Slider(_) => TYPE_SLIDER,
            HitObjectKind::Spinner { .. } => TYPE_SPINNER,
            HitObjectKind::Hold { .. } => TYPE_HOLD,
        };
        if self.new_combo {
            bits |= TYPE_NEW_COMBO;
        }
        bits | ((self.combo_offset & COMBO_OFFSET_MASK) << COMBO_OFFSET_SHIFT)
    }

    /// Encode the object back into its comma-separated record.
    pub fn encode(&self) -> String {
        let mut out = format!(
            "{},{},{},{},{},",
            format_coord(self.position.x),
            format_coord(self.position.y),
            format_time(self.time),
            self.type_bits(),
            self.hit_sounds.bits()
        );

        match &self.kind {
            HitObjectKind::Circle => out.push_str(&self.sample.encode()),
            HitObjectKind::Slider(data) => data.encode(&self.sample, &mut out),
            HitObjectKind::Spinner { end_time } => {
                out.push_str(&format_time(*end_time));
                out.push(',');
                out.push_str(&self.sample.encode());
            }
            HitObjectKind::Hold { end_time } => {
                // the end time shares its field with the sample descriptor
                out.push_str(&format_time(*end_time));
                out.push(':');
                out.push_str(&self.sample.encode());
            }
        }

        out
    }

    /// End time of the object: the start time for circles, the derived or
    /// explicit end time for the other variants.
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle => self.time,
            HitObjectKind::Slider(data) => data.end_time,
            HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => *end_time,
        }
    }
}

/// Parse a required numeric field or report which one failed.
fn require<T: std::str::FromStr>(fields: &[&str], index: usize, line: &str) -> Result<T> {
    fields
        .get(index)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| BeatmapError::field(SECTION, index, line))
}

/// The trailing hit-sample descriptor at `index`, defaulting when absent
/// or not colon-shaped.
fn trailing_sample(fields: &[&str], index: usize) -> HitSample {
    fields
        .get(index)
        .filter(|s| s.contains(':'))
        .map(|s| HitSample::decode(s))
        .unwrap_or_default()
}

/// Decode a hold's 6th field, accepting both the `endTime:sample` bundling
/// and a bare `endTime` followed by a separate sample field.
fn decode_hold(fields: &[&str], time: f64) -> (HitObjectKind, HitSample) {
    match fields.get(5) {
        Some(raw) => match raw.split_once(':') {
            Some((end, rest)) => (
                HitObjectKind::Hold {
                    end_time: end.trim().parse().unwrap_or(time),
                },
                HitSample::decode(rest),
            ),
            None => (
                HitObjectKind::Hold {
                    end_time: raw.trim().parse().unwrap_or(time),
                },
                trailing_sample(fields, 6),
            ),
        },
        None => (HitObjectKind::Hold { end_time: time }, HitSample::default()),
    }
}

/// The `[HitObjects]` section: objects in file order.
///
/// File order is gameplay chronological order; a malformed input with
/// out-of-order times is preserved as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HitObjectsSection {
    /// Hit objects in file order
    pub objects: Vec<HitObject>,
}

impl HitObjectsSection {
    /// Decode the section's lines against the given context.
    pub fn decode(lines: &[String], ctx: &DecodeContext<'_>) -> Result<Self> {
        let objects = lines
            .iter()
            .map(|line| HitObject::decode(line, ctx))
            .collect::<Result<Vec<_>>>()?;
        Ok(HitObjectsSection { objects })
    }

    /// Encode the section, one record per line, each newline-terminated.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for object in &self.objects {
            out.push_str(&object.encode());
            out.push('\n');
        }
        out
    }

    /// The first object starting within `leniency` milliseconds of `time`.
    pub fn hit_object_at(&self, time: f64, leniency: f64) -> Option<&HitObject> {
        self.objects
            .iter()
            .find(|o| (o.time - time).abs() <= leniency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn decode(line: &str) -> HitObject {
        HitObject::decode(line, &DecodeContext::default()).unwrap()
    }

    #[test]
    fn test_type_byte_discrimination() {
        assert!(matches!(decode("0,0,0,1,0").kind, HitObjectKind::Circle));
        assert!(matches!(
            decode("0,0,0,2,0,L|100:0,1,100").kind,
            HitObjectKind::Slider(_)
        ));
        assert!(matches!(
            decode("0,0,0,8,0,500").kind,
            HitObjectKind::Spinner { .. }
        ));
        assert!(matches!(
            decode("0,0,0,128,0,500:0:0:0:0:").kind,
            HitObjectKind::Hold { .. }
        ));
    }

    #[test]
    fn test_type_byte_combo_fields() {
        let object = decode("0,0,0,5,0");
        assert!(matches!(object.kind, HitObjectKind::Circle));
        assert!(object.new_combo);
        assert_eq!(object.combo_offset, 0);

        let object = decode(&format!("0,0,0,{},0", 1 | (3 << 4)));
        assert!(matches!(object.kind, HitObjectKind::Circle));
        assert!(!object.new_combo);
        assert_eq!(object.combo_offset, 3);
    }

    #[test]
    fn test_decode_circles() {
        let a = decode("256,192,1000,1,0,0:0:0:0:");
        let b = decode("100,100,2000,1,0,0:0:0:0:");

        assert_relative_eq!(a.time, 1000.0);
        assert_eq!(a.position, Position { x: 256.0, y: 192.0 });
        assert_relative_eq!(b.time, 2000.0);
        assert_eq!(b.position, Position { x: 100.0, y: 100.0 });
    }

    #[test]
    fn test_decode_hit_sounds() {
        let object = decode("0,0,0,1,10,0:0:0:0:");
        assert_eq!(object.hit_sounds, HitSounds::WHISTLE | HitSounds::CLAP);
    }

    #[test]
    fn test_decode_spinner() {
        let object = decode("256,192,1000,12,4,2500,0:0:0:0:");
        assert!(object.new_combo);
        match object.kind {
            HitObjectKind::Spinner { end_time } => assert_relative_eq!(end_time, 2500.0),
            _ => panic!("expected spinner"),
        }
    }

    #[test]
    fn test_decode_hold_both_bundlings() {
        let bundled = decode("64,192,1000,128,0,2000:1:0:0:70:");
        match bundled.kind {
            HitObjectKind::Hold { end_time } => assert_relative_eq!(end_time, 2000.0),
            _ => panic!("expected hold"),
        }
        assert_eq!(bundled.sample.normal_set, 1);
        assert_eq!(bundled.sample.volume, 70);

        let separate = decode("64,192,1000,128,0,2000,1:0:0:70:");
        match separate.kind {
            HitObjectKind::Hold { end_time } => assert_relative_eq!(end_time, 2000.0),
            _ => panic!("expected hold"),
        }
        assert_eq!(separate.sample.normal_set, 1);
    }

    #[test]
    fn test_required_fields_fail() {
        let ctx = DecodeContext::default();
        for (line, field) in [
            ("abc,192,1000,1,0", 0),
            ("256,x,1000,1,0", 1),
            ("256,192,zz,1,0", 2),
            ("256,192,1000,?,0", 3),
            ("256,192", 2),
        ] {
            let err = HitObject::decode(line, &ctx).unwrap_err();
            match err {
                BeatmapError::FieldParse { field: f, .. } => assert_eq!(f, field),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_encode_circle() {
        let object = decode("256,192,1000,5,2,0:0:0:0:");
        assert_eq!(object.encode(), "256,192,1000,5,2,0:0:0:0:");
    }

    #[test]
    fn test_encode_spinner_and_hold() {
        let spinner = decode("256,192,1000,8,0,2500,0:0:0:0:");
        assert_eq!(spinner.encode(), "256,192,1000,8,0,2500,0:0:0:0:");

        let hold = decode("64,192,1000,128,0,2000:0:0:0:0:");
        assert_eq!(hold.encode(), "64,192,1000,128,0,2000:0:0:0:0:");
    }

    #[test]
    fn test_encode_slider_round_trip() {
        let line = "36,68,4040,2,0,P|96:132|167:112,1,140,8|0,0:0|0:0,0:0:0:0:";
        assert_eq!(decode(line).encode(), line);
    }

    #[test]
    fn test_section_preserves_file_order() {
        let lines: Vec<String> = ["100,100,2000,1,0,0:0:0:0:", "256,192,1000,1,0,0:0:0:0:"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let section = HitObjectsSection::decode(&lines, &DecodeContext::default()).unwrap();

        assert_eq!(section.objects.len(), 2);
        // out-of-order times stay as-is
        assert_relative_eq!(section.objects[0].time, 2000.0);
        assert_relative_eq!(section.objects[1].time, 1000.0);
    }

    #[test]
    fn test_hit_object_at() {
        let lines: Vec<String> = vec!["256,192,1000,1,0,0:0:0:0:".to_string()];
        let section = HitObjectsSection::decode(&lines, &DecodeContext::default()).unwrap();

        assert!(section.hit_object_at(1001.0, 2.0).is_some());
        assert!(section.hit_object_at(1010.0, 2.0).is_none());
    }
}
