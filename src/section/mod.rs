//! Section Splitter & Flat-Field Sections
//!
//! A beatmap document groups its lines under bracketed `[SectionName]`
//! headers. This module partitions raw lines into named sections and hosts
//! the plain key-value sections (General, Editor, Metadata, Difficulty,
//! Colours) plus the verbatim Events section.
//!
//! Splitter contract: lines are trimmed except inside Events, where
//! storyboard indentation is significant; whitespace-only lines are
//! dropped; a line starting with `[` that is not a well-formed header is a
//! structural failure; unknown section names are retained in the map but
//! ignored by beatmap assembly.

pub mod colours;
pub mod difficulty;
pub mod editor;
pub mod events;
pub mod general;
pub mod metadata;

pub use colours::{Colour, ColoursSection, ComboColour};
pub use difficulty::DifficultySection;
pub use editor::EditorSection;
pub use events::EventsSection;
pub use general::GeneralSection;
pub use metadata::MetadataSection;

use crate::{BeatmapError, Result};
use std::collections::HashMap;

/// The canonical section names this codec assembles.
pub const KNOWN_SECTIONS: [&str; 8] = [
    "General",
    "Editor",
    "Metadata",
    "Difficulty",
    "Events",
    "TimingPoints",
    "Colours",
    "HitObjects",
];

/// Partition the lines following the format header into named sections.
pub fn split_sections(lines: &[&str]) -> Result<HashMap<String, Vec<String>>> {
    let mut sections: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('[') {
            if !trimmed.ends_with(']') {
                return Err(BeatmapError::Structural(format!(
                    "malformed section header: {line:?}"
                )));
            }
            let name = trimmed.trim_matches(&['[', ']'][..]).to_string();
            log::debug!("section [{name}]");
            // a repeated header discards the earlier occurrence's lines
            sections.insert(name.clone(), Vec::new());
            current = Some(name);
            continue;
        }

        let Some(name) = &current else {
            return Err(BeatmapError::Structural(format!(
                "content before the first section header: {line:?}"
            )));
        };

        // Events lines keep their leading whitespace
        let content = if name == "Events" {
            (*line).to_string()
        } else {
            trimmed.to_string()
        };
        if let Some(body) = sections.get_mut(name) {
            body.push(content);
        }
    }

    Ok(sections)
}

/// Split a trimmed `Key:value` line, trimming both halves.
pub(crate) fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let lines = vec!["[General]", "AudioFilename: audio.mp3", "", "[HitObjects]"];
        let sections = split_sections(&lines).unwrap();

        assert_eq!(sections["General"], vec!["AudioFilename: audio.mp3"]);
        assert!(sections["HitObjects"].is_empty());
        assert!(!sections.contains_key("Editor"));
    }

    #[test]
    fn test_events_lines_untrimmed() {
        let lines = vec!["[Events]", " _M,0,100,200", "[General]", "  Mode: 0  "];
        let sections = split_sections(&lines).unwrap();

        assert_eq!(sections["Events"], vec![" _M,0,100,200"]);
        assert_eq!(sections["General"], vec!["Mode: 0"]);
    }

    #[test]
    fn test_repeated_header_resets_section() {
        let lines = vec!["[General]", "Mode: 0", "[General]", "AudioFilename: a.mp3"];
        let sections = split_sections(&lines).unwrap();
        assert_eq!(sections["General"], vec!["AudioFilename: a.mp3"]);
    }

    #[test]
    fn test_unknown_section_retained() {
        let lines = vec!["[Mania]", "Keymap: 4"];
        let sections = split_sections(&lines).unwrap();
        assert_eq!(sections["Mania"], vec!["Keymap: 4"]);
    }

    #[test]
    fn test_malformed_header_fails() {
        let err = split_sections(&["[General"]).unwrap_err();
        assert!(matches!(err, BeatmapError::Structural(_)));
    }

    #[test]
    fn test_content_before_header_fails() {
        let err = split_sections(&["AudioFilename: audio.mp3"]).unwrap_err();
        assert!(matches!(err, BeatmapError::Structural(_)));
    }

    #[test]
    fn test_key_value() {
        assert_eq!(key_value("Title:A:B"), Some(("Title", "A:B")));
        assert_eq!(key_value("Mode: 0"), Some(("Mode", "0")));
        assert_eq!(key_value("no separator"), None);
    }
}
