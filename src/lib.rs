//! osu! beatmap codec
//!
//! A decoder, encoder and query engine for the line-oriented, sectioned
//! `.osu` beatmap text format: gameplay hit objects placed in time,
//! tempo/volume control points, chart metadata and cosmetic settings.
//!
//! # Features
//! - Full decode of the modern (v14-family) and legacy/alternate (v128)
//!   format families
//! - Polymorphic hit-object model (circle, slider, spinner, hold) with the
//!   wire-exact bit-packed type byte
//! - Timing-point query engine: effective BPM, volume and slider-velocity
//!   multiplier at any timestamp
//! - Byte-faithful encode: decode→encode round trips are lossless on
//!   well-formed files, and re-encoding is idempotent
//! - Tolerant decode of real-world archive irregularities, with an opt-in
//!   strict mode
//!
//! # Quick start
//! ## Decode and query
//! ```no_run
//! use beatmap_codec::Beatmap;
//! let text = std::fs::read_to_string("chart.osu").unwrap();
//! let beatmap = Beatmap::decode(&text).unwrap();
//! println!("BPM at 5s: {}", beatmap.bpm_at(5000.0));
//! println!("objects: {}", beatmap.hit_objects.objects.len());
//! ```
//!
//! ## Modify and re-encode
//! ```no_run
//! use beatmap_codec::Beatmap;
//! let text = std::fs::read_to_string("chart.osu").unwrap();
//! let mut beatmap = Beatmap::decode(&text).unwrap();
//! beatmap.metadata.version = Some("Remapped".into());
//! let out = beatmap.encode();
//! std::fs::write("chart.osu", out).unwrap();
//! ```

#![warn(missing_docs)]

// Domain modules
pub mod beatmap; // Root model & decode/encode orchestration
pub mod format; // Format families & numeric formatting helpers
pub mod hit_object; // Hit Object Model & Codec
pub mod loader; // Beatmap File I/O
pub mod section; // Section splitter & flat-field sections
pub mod timing; // Timing Point Model & Query Engine

/// Error types for beatmap decode/encode operations
#[derive(thiserror::Error, Debug)]
pub enum BeatmapError {
    /// Fatal document-level failure: empty input, malformed format header,
    /// or a required section missing. No partial beatmap is returned.
    #[error("invalid beatmap structure: {0}")]
    Structural(String),

    /// A structurally required field of a record is absent or non-numeric.
    /// Carries enough context to locate the offending input line.
    #[error("failed to parse {section} field {field}: {line:?}")]
    FieldParse {
        /// Name of the section the record belongs to
        section: &'static str,
        /// Zero-based index of the offending field
        field: usize,
        /// The raw input line
        line: String,
    },

    /// IO error from the filesystem loader
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BeatmapError {
    /// Construct a [`BeatmapError::FieldParse`] for the given record.
    pub fn field(section: &'static str, field: usize, line: &str) -> Self {
        BeatmapError::FieldParse {
            section,
            field,
            line: line.to_string(),
        }
    }
}

/// Result type for beatmap operations
pub type Result<T> = std::result::Result<T, BeatmapError>;

// Public API exports
pub use beatmap::{Beatmap, DecodeOptions};
pub use format::FormatVersion;
pub use hit_object::{
    CurveKind, DecodeContext, HitObject, HitObjectKind, HitObjectsSection, HitSample, HitSounds,
    Position, SliderData,
};
pub use loader::{load_file, BeatmapLoader};
pub use timing::{Effects, InheritedPoint, TimingPoint, TimingPointsSection, UninheritedPoint};
