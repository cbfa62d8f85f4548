//! `[Metadata]` Section
//!
//! Descriptive chart information, `Key:value` with no space after the
//! colon. Values may themselves contain colons, so only the first one
//! separates.

use super::key_value;
use serde::{Deserialize, Serialize};

/// Chart title, authorship and identification metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataSection {
    /// Romanised song title
    pub title: Option<String>,
    /// Native-script song title
    pub title_unicode: Option<String>,
    /// Romanised artist
    pub artist: Option<String>,
    /// Native-script artist
    pub artist_unicode: Option<String>,
    /// Chart author
    pub creator: Option<String>,
    /// Difficulty name
    pub version: Option<String>,
    /// Source media of the song
    pub source: Option<String>,
    /// Space-separated search tags
    pub tags: Option<String>,
    /// Online difficulty id
    pub beatmap_id: Option<i64>,
    /// Online set id
    pub beatmap_set_id: Option<i64>,
}

impl MetadataSection {
    /// Decode the section lines, ignoring unknown keys. Empty values stay
    /// present (e.g. a bare `Source:` line survives a round trip).
    pub fn decode(lines: &[String]) -> Self {
        let mut section = MetadataSection::default();
        for line in lines {
            let Some((key, value)) = key_value(line) else {
                continue;
            };
            match key {
                "Title" => section.title = Some(value.to_string()),
                "TitleUnicode" => section.title_unicode = Some(value.to_string()),
                "Artist" => section.artist = Some(value.to_string()),
                "ArtistUnicode" => section.artist_unicode = Some(value.to_string()),
                "Creator" => section.creator = Some(value.to_string()),
                "Version" => section.version = Some(value.to_string()),
                "Source" => section.source = Some(value.to_string()),
                "Tags" => section.tags = Some(value.to_string()),
                "BeatmapID" => section.beatmap_id = value.parse().ok(),
                "BeatmapSetID" => section.beatmap_set_id = value.parse().ok(),
                _ => log::debug!("unknown [Metadata] key: {key}"),
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
                out.push(':');
                out.push_str(&value);
                out.push('\n');
            }
        };

        push("Title", self.title.clone());
        push("TitleUnicode", self.title_unicode.clone());
        push("Artist", self.artist.clone());
        push("ArtistUnicode", self.artist_unicode.clone());
        push("Creator", self.creator.clone());
        push("Version", self.version.clone());
        push("Source", self.source.clone());
        push("Tags", self.tags.clone());
        push("BeatmapID", self.beatmap_id.map(|v| v.to_string()));
        push("BeatmapSetID", self.beatmap_set_id.map(|v| v.to_string()));

        out
    }
}
