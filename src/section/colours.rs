//! `[Colours]` Section
//!
//! Combo colour palette and slider cosmetics. The two format families
//! disagree on this section's surface: the modern family separates with
//! `" : "` and writes bare `r,g,b` triplets, the legacy/alternate family
//! separates with `": "` and appends a `,255` alpha component.

use super::key_value;
use crate::format::FormatVersion;
use serde::{Deserialize, Serialize};

/// An RGB colour triplet. An alpha component on the wire is accepted and
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Colour {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Colour {
    /// Parse an `r,g,b[,a]` triplet, defaulting malformed components to 0.
    pub fn decode(value: &str) -> Self {
        let mut parts = value.split(',');
        let mut next = |parts: &mut std::str::Split<'_, char>| {
            parts
                .next()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0)
        };
        Colour {
            r: next(&mut parts),
            g: next(&mut parts),
            b: next(&mut parts),
        }
    }

    /// Format the triplet with the family's alpha convention.
    pub fn encode(&self, version: FormatVersion) -> String {
        match version {
            FormatVersion::V14 => format!("{},{},{}", self.r, self.g, self.b),
            FormatVersion::V128 => format!("{},{},{},255", self.r, self.g, self.b),
        }
    }
}

/// One numbered combo palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboColour {
    /// The palette slot number from the `Combo<N>` key
    pub number: u32,
    /// The slot's colour
    pub colour: Colour,
}

/// Cosmetic colour settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColoursSection {
    /// Combo palette entries in file order
    pub combos: Vec<ComboColour>,
    /// Slider border colour override
    pub slider_border: Option<Colour>,
    /// Additive slider track colour override
    pub slider_track_override: Option<Colour>,
}

impl ColoursSection {
    /// Decode the section lines, ignoring unknown keys.
    pub fn decode(lines: &[String]) -> Self {
        let mut section = ColoursSection::default();
        for line in lines {
            let Some((key, value)) = key_value(line) else {
                continue;
            };
            if let Some(number) = key.strip_prefix("Combo") {
                section.combos.push(ComboColour {
                    number: number.trim().parse().unwrap_or(0),
                    colour: Colour::decode(value),
                });
            } else if key == "SliderBorder" {
                section.slider_border = Some(Colour::decode(value));
            } else if key == "SliderTrackOverride" {
                section.slider_track_override = Some(Colour::decode(value));
            } else {
                log::debug!("unknown [Colours] key: {key}");
            }
        }
        section
    }

    /// Encode combos then slider overrides, newline-terminated, using the
    /// family's separator and alpha conventions.
    pub fn encode(&self, version: FormatVersion) -> String {
        let separator = match version {
            FormatVersion::V14 => " : ",
            FormatVersion::V128 => ": ",
        };

        let mut out = String::new();
        for combo in &self.combos {
            out.push_str(&format!(
                "Combo{}{}{}\n",
                combo.number,
                separator,
                combo.colour.encode(version)
            ));
        }
        if let Some(colour) = self.slider_border {
            out.push_str(&format!(
                "SliderBorder{}{}\n",
                separator,
                colour.encode(version)
            ));
        }
        if let Some(colour) = self.slider_track_override {
            out.push_str(&format!(
                "SliderTrackOverride{}{}\n",
                separator,
                colour.encode(version)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode() {
        let section = ColoursSection::decode(&lines(&[
            "Combo1 : 255,128,0",
            "Combo2 : 0,202,0,255",
            "SliderBorder : 120,130,140",
        ]));

        assert_eq!(section.combos.len(), 2);
        assert_eq!(section.combos[0].number, 1);
        assert_eq!(
            section.combos[0].colour,
            Colour { r: 255, g: 128, b: 0 }
        );
        // alpha component accepted and dropped
        assert_eq!(section.combos[1].colour, Colour { r: 0, g: 202, b: 0 });
        assert_eq!(
            section.slider_border,
            Some(Colour { r: 120, g: 130, b: 140 })
        );
    }

    #[test]
    fn test_encode_modern_family() {
        let section = ColoursSection::decode(&lines(&["Combo1 : 255,128,0"]));
        assert_eq!(
            section.encode(FormatVersion::V14),
            "Combo1 : 255,128,0\n"
        );
    }

    #[test]
    fn test_encode_legacy_family() {
        let section = ColoursSection::decode(&lines(&["Combo1: 255,128,0,255"]));
        assert_eq!(
            section.encode(FormatVersion::V128),
            "Combo1: 255,128,0,255\n"
        );
    }
}
