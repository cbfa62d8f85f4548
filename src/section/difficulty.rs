//! `[Difficulty]` Section
//!
//! Numeric difficulty settings, `Key:value` with no space after the colon.
//! The slider multiplier is the one value the hit-object codec depends on.

use super::key_value;
use crate::format::format_decimal;
use serde::{Deserialize, Serialize};

/// Fallback base slider multiplier when the field is absent
pub const DEFAULT_SLIDER_MULTIPLIER: f64 = 1.4;

/// Gameplay difficulty numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DifficultySection {
    /// Health drain rate (0-10)
    pub hp_drain_rate: Option<f64>,
    /// Circle size / mania key count
    pub circle_size: Option<f64>,
    /// Hit window strictness (0-10)
    pub overall_difficulty: Option<f64>,
    /// Approach rate (0-10)
    pub approach_rate: Option<f64>,
    /// Base slider velocity in hundreds of osu!-pixels per beat
    pub slider_multiplier: Option<f64>,
    /// Slider ticks per beat
    pub slider_tick_rate: Option<f64>,
}

impl DifficultySection {
    /// Decode the section lines, ignoring unknown keys.
    pub fn decode(lines: &[String]) -> Self {
        let mut section = DifficultySection::default();
        for line in lines {
            let Some((key, value)) = key_value(line) else {
                continue;
            };
            match key {
                "HPDrainRate" => section.hp_drain_rate = value.parse().ok(),
                "CircleSize" => section.circle_size = value.parse().ok(),
                "OverallDifficulty" => section.overall_difficulty = value.parse().ok(),
                "ApproachRate" => section.approach_rate = value.parse().ok(),
                "SliderMultiplier" => section.slider_multiplier = value.parse().ok(),
                "SliderTickRate" => section.slider_tick_rate = value.parse().ok(),
                _ => log::debug!("unknown [Difficulty] key: {key}"),
            }
        }
        section
    }

    /// Encode present fields in canonical order, newline-terminated.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        let mut push = |key: &str, value: Option<f64>| {
            if let Some(value) = value {
                out.push_str(key);
                out.push(':');
                out.push_str(&format_decimal(value));
                out.push('\n');
            }
        };

        push("HPDrainRate", self.hp_drain_rate);
        push("CircleSize", self.circle_size);
        push("OverallDifficulty", self.overall_difficulty);
        push("ApproachRate", self.approach_rate);
        push("SliderMultiplier", self.slider_multiplier);
        push("SliderTickRate", self.slider_tick_rate);

        out
    }

    /// The base slider multiplier, falling back to 1.4 when unset.
    pub fn base_slider_multiplier(&self) -> f64 {
        self.slider_multiplier.unwrap_or(DEFAULT_SLIDER_MULTIPLIER)
    }
}
