//! `[General]` Section
//!
//! Flat key-value settings, `Key: value` with a space after the colon.
//! Every field is optional; only fields present in the source are encoded
//! back, in the canonical key order.

use super::key_value;
use crate::format::format_decimal;
use serde::{Deserialize, Serialize};

/// General gameplay and presentation settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneralSection {
    /// Audio file relative to the beatmap directory
    pub audio_filename: Option<String>,
    /// Milliseconds of silence before the audio starts
    pub audio_lead_in: Option<i32>,
    /// Preview point time in milliseconds (-1 for none)
    pub preview_time: Option<i32>,
    /// Countdown speed before the first object (0 = none)
    pub countdown: Option<i32>,
    /// Default sample set name (Normal/Soft/Drum)
    pub sample_set: Option<String>,
    /// Stacking leniency multiplier
    pub stack_leniency: Option<f64>,
    /// Game mode (0 = osu!, 1 = taiko, 2 = catch, 3 = mania)
    pub mode: Option<i32>,
    /// Letterbox the screen during breaks
    pub letterbox_in_breaks: Option<i32>,
    /// Use skin sprites in the storyboard
    pub use_skin_sprites: Option<i32>,
    /// Draw position of hit circle overlays
    pub overlay_position: Option<String>,
    /// Preferred skin name
    pub skin_preference: Option<String>,
    /// Show an epilepsy warning before the storyboard
    pub epilepsy_warning: Option<i32>,
    /// Beats the countdown starts before the first object
    pub countdown_offset: Option<i32>,
    /// Use mania special (N+1) style
    pub special_style: Option<i32>,
    /// Widescreen storyboard support
    pub widescreen_storyboard: Option<i32>,
    /// Adjust sample rate with speed-changing mods
    pub samples_match_playback_rate: Option<i32>,
}

impl GeneralSection {
    /// Decode the section lines, ignoring unknown keys.
    pub fn decode(lines: &[String]) -> Self {
        let mut section = GeneralSection::default();
        for line in lines {
            let Some((key, value)) = key_value(line) else {
                continue;
            };
            match key {
                "AudioFilename" => section.audio_filename = Some(value.to_string()),
                "AudioLeadIn" => section.audio_lead_in = value.parse().ok(),
                "PreviewTime" => section.preview_time = value.parse().ok(),
                "Countdown" => section.countdown = value.parse().ok(),
                "SampleSet" => section.sample_set = Some(value.to_string()),
                "StackLeniency" => section.stack_leniency = value.parse().ok(),
                "Mode" => section.mode = value.parse().ok(),
                "LetterboxInBreaks" => section.letterbox_in_breaks = value.parse().ok(),
                "UseSkinSprites" => section.use_skin_sprites = value.parse().ok(),
                "OverlayPosition" => section.overlay_position = Some(value.to_string()),
                "SkinPreference" => section.skin_preference = Some(value.to_string()),
                "EpilepsyWarning" => section.epilepsy_warning = value.parse().ok(),
                "CountdownOffset" => section.countdown_offset = value.parse().ok(),
                "SpecialStyle" => section.special_style = value.parse().ok(),
                "WidescreenStoryboard" => section.widescreen_storyboard = value.parse().ok(),
                "SamplesMatchPlaybackRate" => {
                    section.samples_match_playback_rate = value.parse().ok()
                }
                _ => log::debug!("unknown [General] key: {key}"),
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

        push("AudioFilename", self.audio_filename.clone());
        push("AudioLeadIn", self.audio_lead_in.map(|v| v.to_string()));
        push("PreviewTime", self.preview_time.map(|v| v.to_string()));
        push("Countdown", self.countdown.map(|v| v.to_string()));
        push("SampleSet", self.sample_set.clone());
        push("StackLeniency", self.stack_leniency.map(format_decimal));
        push("Mode", self.mode.map(|v| v.to_string()));
        push(
            "LetterboxInBreaks",
            self.letterbox_in_breaks.map(|v| v.to_string()),
        );
        push("UseSkinSprites", self.use_skin_sprites.map(|v| v.to_string()));
        push("OverlayPosition", self.overlay_position.clone());
        push("SkinPreference", self.skin_preference.clone());
        push(
            "EpilepsyWarning",
            self.epilepsy_warning.map(|v| v.to_string()),
        );
        push(
            "CountdownOffset",
            self.countdown_offset.map(|v| v.to_string()),
        );
        push("SpecialStyle", self.special_style.map(|v| v.to_string()));
        push(
            "WidescreenStoryboard",
            self.widescreen_storyboard.map(|v| v.to_string()),
        );
        push(
            "SamplesMatchPlaybackRate",
            self.samples_match_playback_rate.map(|v| v.to_string()),
        );

        out
    }
}
