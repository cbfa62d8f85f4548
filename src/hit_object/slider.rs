//! Slider Path Codec
//!
//! Sliders append to the common payload a pipe-delimited path field
//! (`curveKind|x1:y1|x2:y2|...`), a slide count, a pixel length, and two
//! optional pipe-delimited per-edge override lists (`edgeSounds`,
//! `edgeSets`) that each carry one entry per repeat edge, i.e.
//! `slides + 1` entries when well-formed.

use super::{DecodeContext, HitSample, HitSounds, Position, SECTION};
use crate::{BeatmapError, Result};
use serde::{Deserialize, Serialize};

/// Shape of a slider's path curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    /// Straight line segments (`L`)
    Linear,
    /// Circular arc through three points (`P`)
    Perfect,
    /// Bezier curve (`B`)
    Bezier,
    /// Catmull-Rom spline (`C`)
    Catmull,
}

impl CurveKind {
    /// Map a wire tag to its curve kind. Unknown tags fall back to linear,
    /// matching how clients treat unrecognized shapes.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "P" => CurveKind::Perfect,
            "B" => CurveKind::Bezier,
            "C" => CurveKind::Catmull,
            _ => CurveKind::Linear,
        }
    }

    /// The single-letter wire tag.
    pub fn tag(self) -> char {
        match self {
            CurveKind::Linear => 'L',
            CurveKind::Perfect => 'P',
            CurveKind::Bezier => 'B',
            CurveKind::Catmull => 'C',
        }
    }
}

/// Slider-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderData {
    /// Path curve shape
    pub curve_kind: CurveKind,
    /// Path control points, excluding the object position
    pub control_points: Vec<Position>,
    /// Number of times the path is traversed (>= 1)
    pub slides: u32,
    /// Visual path length in osu!-pixels
    pub length: f64,
    /// Per-edge hit-sound overrides, one per repeat edge when present
    pub edge_sounds: Option<Vec<HitSounds>>,
    /// Per-edge sample-set overrides `(normalSet, additionSet)`
    pub edge_sets: Option<Vec<(u32, u32)>>,
    /// End time derived from the timing engine at decode; not on the wire
    pub end_time: f64,
}

impl SliderData {
    /// Decode the slider fields (index 5 onward) together with the trailing
    /// hit-sample descriptor.
    pub(super) fn decode(
        fields: &[&str],
        line: &str,
        time: f64,
        ctx: &DecodeContext<'_>,
    ) -> Result<(SliderData, HitSample)> {
        let mut path = fields.get(5).copied().unwrap_or("L").split('|');
        let curve_kind = CurveKind::from_tag(path.next().unwrap_or("L"));
        let control_points = path.filter_map(parse_point).collect();

        let slides = fields
            .get(6)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        let length = fields
            .get(7)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0);

        // the sample descriptor closes the record whenever the final field
        // is colon-shaped; edge lists are pipe-delimited and never match
        let sample_field = fields
            .last()
            .filter(|s| fields.len() > 8 && s.contains(':') && !s.contains('|'));
        let extras_end = fields.len() - usize::from(sample_field.is_some());

        let edges = slides as usize + 1;
        let edge_sounds = match fields.get(8).filter(|s| extras_end > 8 && !s.is_empty()) {
            Some(raw) => {
                let sounds = raw
                    .split('|')
                    .map(|s| HitSounds::from_bits_truncate(s.trim().parse().unwrap_or(0)))
                    .collect();
                Some(fit_edges(sounds, edges, HitSounds::empty(), 8, line, ctx)?)
            }
            None => None,
        };
        let edge_sets = match fields.get(9).filter(|s| extras_end > 9 && !s.is_empty()) {
            Some(raw) => {
                let sets = raw.split('|').map(parse_edge_set).collect();
                Some(fit_edges(sets, edges, (0, 0), 9, line, ctx)?)
            }
            None => None,
        };

        let sample = sample_field
            .map(|s| HitSample::decode(s))
            .unwrap_or_default();

        let end_time = time + slider_duration(time, length, slides, ctx);

        Ok((
            SliderData {
                curve_kind,
                control_points,
                slides,
                length,
                edge_sounds,
                edge_sets,
                end_time,
            },
            sample,
        ))
    }

    /// Encode the slider fields following the hit-sound field.
    ///
    /// When no per-edge overrides exist the edge-list fields are left off
    /// entirely: an all-default sample is dropped with them, a non-default
    /// one closes the record on its own. Either way short real-world
    /// slider records stay byte-identical through a round trip.
    pub(super) fn encode(&self, sample: &HitSample, out: &mut String) {
        out.push(self.curve_kind.tag());
        for point in &self.control_points {
            out.push('|');
            out.push_str(&crate::format::format_coord(point.x));
            out.push(':');
            out.push_str(&crate::format::format_coord(point.y));
        }
        out.push_str(&format!(",{},{}", self.slides, crate::format::format_decimal(self.length)));

        let has_overrides = self.edge_sounds.is_some() || self.edge_sets.is_some();
        if !has_overrides {
            if *sample != HitSample::default() {
                out.push(',');
                out.push_str(&sample.encode());
            }
            return;
        }

        let edges = self.slides as usize + 1;
        let sounds = match &self.edge_sounds {
            Some(sounds) => sounds.clone(),
            None => vec![HitSounds::empty(); edges],
        };
        out.push(',');
        out.push_str(
            &sounds
                .iter()
                .map(|s| s.bits().to_string())
                .collect::<Vec<_>>()
                .join("|"),
        );

        let sets = match &self.edge_sets {
            Some(sets) => sets.clone(),
            None => vec![(0, 0); edges],
        };
        out.push(',');
        out.push_str(
            &sets
                .iter()
                .map(|(n, a)| format!("{n}:{a}"))
                .collect::<Vec<_>>()
                .join("|"),
        );

        out.push(',');
        out.push_str(&sample.encode());
    }
}

/// Parse an `x:y` control point, skipping malformed pairs.
fn parse_point(pair: &str) -> Option<Position> {
    let (x, y) = pair.split_once(':')?;
    Some(Position {
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
    })
}

/// Parse a `normalSet:additionSet` edge entry, defaulting bad digits.
fn parse_edge_set(entry: &str) -> (u32, u32) {
    let (n, a) = entry.split_once(':').unwrap_or((entry, "0"));
    (
        n.trim().parse().unwrap_or(0),
        a.trim().parse().unwrap_or(0),
    )
}

/// Bring a per-edge list to exactly `edges` entries.
///
/// Real-world archives routinely carry mismatched counts; tolerant mode
/// truncates or pads with the default and logs, strict mode fails the line.
fn fit_edges<T: Clone>(
    mut list: Vec<T>,
    edges: usize,
    default: T,
    field: usize,
    line: &str,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<T>> {
    if list.len() != edges {
        if ctx.strict_edge_lists {
            return Err(BeatmapError::field(SECTION, field, line));
        }
        log::warn!(
            "slider edge list has {} entries, expected {}: {line:?}",
            list.len(),
            edges
        );
        list.resize(edges, default);
    }
    Ok(list)
}

/// Milliseconds one full traversal set of the slider takes.
///
/// `effectiveVelocity = baseSliderMultiplier * inheritedMultiplier * 100`
/// osu!-pixels per beat; the duration scales the path length by the beat
/// length and slide count.
fn slider_duration(time: f64, length: f64, slides: u32, ctx: &DecodeContext<'_>) -> f64 {
    let (beat_length, velocity) = match ctx.timing {
        Some(timing) => (
            timing.beat_length_at(time),
            timing.velocity_multiplier_at(time),
        ),
        None => (500.0, 1.0),
    };

    let px_per_beat = ctx.slider_multiplier * 100.0 * velocity;
    if px_per_beat <= 0.0 || beat_length <= 0.0 {
        return 0.0;
    }
    length / px_per_beat * beat_length * slides as f64
}
