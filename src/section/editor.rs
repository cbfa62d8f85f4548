//! `[Editor]` Section
//!
//! Saved editor state. The whole section is optional; absent and
//! present-but-empty are distinct states at the beatmap level.

use super::key_value;
use crate::format::format_decimal;
use serde::{Deserialize, Serialize};

/// Editor preferences stored with the chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorSection {
    /// Bookmarked times in milliseconds
    pub bookmarks: Option<Vec<i32>>,
    /// Distance snap multiplier
    pub distance_spacing: Option<f64>,
    /// Beat snap divisor
    pub beat_divisor: Option<i32>,
    /// Grid size in osu!-pixels
    pub grid_size: Option<i32>,
    /// Timeline zoom factor
    pub timeline_zoom: Option<f64>,
}

impl EditorSection {
    /// Decode the section lines, ignoring unknown keys.
    pub fn decode(lines: &[String]) -> Self {
        let mut section = EditorSection::default();
        for line in lines {
            let Some((key, value)) = key_value(line) else {
                continue;
            };
            match key {
                "Bookmarks" => {
                    section.bookmarks = Some(
                        value
                            .split(',')
                            .filter_map(|s| s.trim().parse().ok())
                            .collect(),
                    )
                }
                "DistanceSpacing" => section.distance_spacing = value.parse().ok(),
                "BeatDivisor" => section.beat_divisor = value.parse().ok(),
                "GridSize" => section.grid_size = value.parse().ok(),
                "TimelineZoom" => section.timeline_zoom = value.parse().ok(),
                _ => log::debug!("unknown [Editor] key: {key}"),
            }
        }
        section
    }

    /// Encode present fields in canonical order, newline-terminated.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&value);
                out.push('\n');
            }
        };

        push(
            "Bookmarks",
            self.bookmarks.as_ref().map(|marks| {
                marks
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            }),
        );
        push(
            "DistanceSpacing",
            self.distance_spacing.map(format_decimal),
        );
        push("BeatDivisor", self.beat_divisor.map(|v| v.to_string()));
        push("GridSize", self.grid_size.map(|v| v.to_string()));
        push("TimelineZoom", self.timeline_zoom.map(format_decimal));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let raw: Vec<String> = [
            "Bookmarks: 10000,20000",
            "DistanceSpacing: 1.2",
            "BeatDivisor: 4",
            "GridSize: 4",
            "TimelineZoom: 1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let section = EditorSection::decode(&raw);
        assert_eq!(section.bookmarks, Some(vec![10000, 20000]));
        assert_eq!(section.beat_divisor, Some(4));
        assert_eq!(section.encode().lines().collect::<Vec<_>>(), raw);
    }

    #[test]
    fn test_empty_section() {
        let section = EditorSection::decode(&[]);
        assert_eq!(section, EditorSection::default());
        assert_eq!(section.encode(), "");
    }
}
