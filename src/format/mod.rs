//! Format Families & Primitive Codec Helpers
//!
//! The `.osu` format exists in two supported families:
//! - Modern: any numbered version (`osu file format v14` and relatives),
//!   encoded as v14
//! - Legacy/alternate: the distinguished sentinel version 128, with its own
//!   separator and blank-line conventions
//!
//! This module detects the family from the header line and provides the
//! locale-invariant numeric formatting shared by every encoder: integral
//! values never emit a decimal point, matching the source convention.

use crate::{BeatmapError, Result};
use serde::{Deserialize, Serialize};

/// Version header emitted for the modern family
pub const MODERN_HEADER_VERSION: i32 = 14;

/// Distinguished sentinel selecting the legacy/alternate family
pub const LEGACY_SENTINEL: i32 = 128;

/// The two supported format families.
///
/// Threaded explicitly through every encode call; the codec keeps no
/// process-wide format state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatVersion {
    /// Modern numbered family, written as `v14`
    V14,
    /// Legacy/alternate family, written as `v128`
    V128,
}

impl FormatVersion {
    /// Classify a raw header version integer into its family.
    pub fn from_version(version: i32) -> Self {
        if version == LEGACY_SENTINEL {
            FormatVersion::V128
        } else {
            FormatVersion::V14
        }
    }

    /// The version integer written back into the format header.
    pub fn header_version(self) -> i32 {
        match self {
            FormatVersion::V14 => MODERN_HEADER_VERSION,
            FormatVersion::V128 => LEGACY_SENTINEL,
        }
    }
}

/// Parse the raw version integer from the first line of a document.
///
/// The line must contain the literal `file format` marker followed by a
/// `v<integer>` token; anything else is a hard structural failure.
pub fn parse_version_line(line: &str) -> Result<i32> {
    if !line.contains("file format") {
        return Err(BeatmapError::Structural(format!(
            "first line is not a format header: {line:?}"
        )));
    }

    let token = line.rsplit('v').next().unwrap_or("");
    token.trim().parse::<i32>().map_err(|_| {
        BeatmapError::Structural(format!("invalid version token in header: {line:?}"))
    })
}

/// Format a floating-point value without a trailing `.0` when integral.
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Format a coordinate, dropping the decimal point when integral.
pub fn format_coord(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i32)
    } else {
        format!("{value}")
    }
}

/// Format a timestamp in milliseconds.
///
/// Integral times emit as plain integers; fractional times keep their
/// decimal part so decode→encode round trips stay lossless.
pub fn format_time(millis: f64) -> String {
    format_decimal(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_version() {
        assert_eq!(FormatVersion::from_version(14), FormatVersion::V14);
        assert_eq!(FormatVersion::from_version(9), FormatVersion::V14);
        assert_eq!(FormatVersion::from_version(128), FormatVersion::V128);
    }

    #[test]
    fn test_header_version() {
        assert_eq!(FormatVersion::V14.header_version(), 14);
        assert_eq!(FormatVersion::V128.header_version(), 128);
    }

    #[test]
    fn test_parse_version_line() {
        assert_eq!(parse_version_line("osu file format v14").unwrap(), 14);
        assert_eq!(parse_version_line("osu file format v128").unwrap(), 128);
    }

    #[test]
    fn test_parse_version_line_rejects_garbage() {
        assert!(parse_version_line("This is not a valid beatmap file").is_err());
        assert!(parse_version_line("osu file format vX").is_err());
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(500.0), "500");
        assert_eq!(format_decimal(-500.0), "-500");
        assert_eq!(format_decimal(0.7), "0.7");
        assert_eq!(format_decimal(1.4), "1.4");
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(256.0), "256");
        assert_eq!(format_coord(99.5), "99.5");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(1000.0), "1000");
        assert_eq!(format_time(1000.5), "1000.5");
    }
}
