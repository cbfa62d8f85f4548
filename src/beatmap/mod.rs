//! Beatmap Assembly
//!
//! The root model and the decode/encode orchestrator. Decode order
//! matters: timing points are decoded before hit objects because slider
//! lengths are interpreted through the controlling timing point's velocity
//! multiplier and the difficulty's base slider multiplier.
//!
//! Encode emits sections in the canonical order General, Editor?,
//! Metadata, Difficulty, Events, TimingPoints?, Colours?, HitObjects, each
//! under its bracketed header and followed by one blank line — except the
//! final section, and except after Events in the legacy/alternate family,
//! which omits that blank line. Re-encoding an encoded document reproduces
//! it byte for byte.

use crate::format::{self, FormatVersion};
use crate::hit_object::{DecodeContext, HitObject, HitObjectsSection};
use crate::section::{
    split_sections, ColoursSection, DifficultySection, EditorSection, EventsSection,
    GeneralSection, MetadataSection,
};
use crate::timing::{InheritedPoint, TimingPointsSection, UninheritedPoint};
use crate::{BeatmapError, Result};
use serde::{Deserialize, Serialize};

/// Sections that must exist for a document to decode at all.
const REQUIRED_SECTIONS: [&str; 5] = ["General", "Metadata", "Difficulty", "Events", "HitObjects"];

/// Knobs for the decode path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Fail on mismatched slider per-edge override counts instead of
    /// silently repairing them
    pub strict_edge_lists: bool,
}

/// The root document model for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    /// Raw format version from the header; its family governs encoding
    pub version: i32,
    /// `[General]` settings
    pub general: GeneralSection,
    /// `[Editor]` state, absent when the section is missing
    pub editor: Option<EditorSection>,
    /// `[Metadata]` information
    pub metadata: MetadataSection,
    /// `[Difficulty]` numbers
    pub difficulty: DifficultySection,
    /// `[Events]` lines, kept verbatim
    pub events: EventsSection,
    /// `[TimingPoints]`, absent when the section is missing
    pub timing_points: Option<TimingPointsSection>,
    /// `[Colours]`, absent when the section is missing
    pub colours: Option<ColoursSection>,
    /// `[HitObjects]` in file order
    pub hit_objects: HitObjectsSection,
}

impl Default for Beatmap {
    fn default() -> Self {
        Beatmap {
            version: format::MODERN_HEADER_VERSION,
            general: GeneralSection::default(),
            editor: None,
            metadata: MetadataSection::default(),
            difficulty: DifficultySection::default(),
            events: EventsSection::default(),
            timing_points: None,
            colours: None,
            hit_objects: HitObjectsSection::default(),
        }
    }
}

impl Beatmap {
    /// Decode a full document with default options.
    pub fn decode(text: &str) -> Result<Self> {
        Self::decode_with(text, DecodeOptions::default())
    }

    /// Decode a full document.
    ///
    /// Accepts both bare and carriage-return newlines. Fails structurally
    /// on an empty document, a first line without the `file format`
    /// marker, or a missing required section; no partial beatmap is ever
    /// returned.
    pub fn decode_with(text: &str, options: DecodeOptions) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        let Some((header, body)) = lines.split_first() else {
            return Err(BeatmapError::Structural("beatmap is empty".to_string()));
        };
        let version = format::parse_version_line(header)?;

        let sections = split_sections(body)?;
        for name in REQUIRED_SECTIONS {
            if !sections.contains_key(name) {
                return Err(BeatmapError::Structural(format!(
                    "missing required section [{name}]"
                )));
            }
        }

        let general = GeneralSection::decode(&sections["General"]);
        let editor = sections.get("Editor").map(|l| EditorSection::decode(l));
        let metadata = MetadataSection::decode(&sections["Metadata"]);
        let difficulty = DifficultySection::decode(&sections["Difficulty"]);
        let events = EventsSection::decode(&sections["Events"]);
        let colours = sections.get("Colours").map(|l| ColoursSection::decode(l));

        // timing points first: hit objects derive fields from them
        let timing_points = sections
            .get("TimingPoints")
            .map(|l| TimingPointsSection::decode(l))
            .transpose()?;

        let ctx = DecodeContext {
            timing: timing_points.as_ref(),
            slider_multiplier: difficulty.base_slider_multiplier(),
            strict_edge_lists: options.strict_edge_lists,
        };
        let hit_objects = HitObjectsSection::decode(&sections["HitObjects"], &ctx)?;

        Ok(Beatmap {
            version,
            general,
            editor,
            metadata,
            difficulty,
            events,
            timing_points,
            colours,
            hit_objects,
        })
    }

    /// The format family governing this beatmap's encoding.
    pub fn format_version(&self) -> FormatVersion {
        FormatVersion::from_version(self.version)
    }

    /// Encode the whole document.
    ///
    /// Sections are emitted in canonical order; optional sections only
    /// when present. The header version is normalized to the family
    /// sentinel (14 or 128).
    pub fn encode(&self) -> String {
        let version = self.format_version();
        let mut out = format!("osu file format v{}\n\n", version.header_version());

        push_section(&mut out, "General", &self.general.encode(), true);
        if let Some(editor) = &self.editor {
            push_section(&mut out, "Editor", &editor.encode(), true);
        }
        push_section(&mut out, "Metadata", &self.metadata.encode(), true);
        push_section(&mut out, "Difficulty", &self.difficulty.encode(), true);

        // the legacy/alternate family omits the blank line after Events
        push_section(
            &mut out,
            "Events",
            &self.events.encode(),
            version != FormatVersion::V128,
        );

        if let Some(timing) = &self.timing_points {
            push_section(&mut out, "TimingPoints", &timing.encode(), true);
        }
        if let Some(colours) = &self.colours {
            push_section(&mut out, "Colours", &colours.encode(version), true);
        }
        push_section(&mut out, "HitObjects", &self.hit_objects.encode(), false);

        out
    }

    /// The uninherited timing point in effect at `time`.
    pub fn uninherited_at(&self, time: f64) -> Option<&UninheritedPoint> {
        self.timing_points.as_ref()?.uninherited_at(time)
    }

    /// The inherited timing point controlling slider velocity at `time`.
    pub fn inherited_at(&self, time: f64) -> Option<&InheritedPoint> {
        self.timing_points.as_ref()?.inherited_at(time)
    }

    /// Effective BPM at `time`, 120 when no timing points exist.
    pub fn bpm_at(&self, time: f64) -> f64 {
        self.timing_points
            .as_ref()
            .map(|t| t.bpm_at(time))
            .unwrap_or(crate::timing::DEFAULT_BPM)
    }

    /// Effective volume at `time`, 100 when no timing points exist.
    pub fn volume_at(&self, time: f64) -> u32 {
        self.timing_points
            .as_ref()
            .map(|t| t.volume_at(time))
            .unwrap_or(crate::timing::DEFAULT_VOLUME)
    }

    /// The hit object starting within `leniency` milliseconds of `time`.
    pub fn hit_object_at(&self, time: f64, leniency: f64) -> Option<&HitObject> {
        self.hit_objects.hit_object_at(time, leniency)
    }

    /// The background image filename from the events section.
    pub fn background_filename(&self) -> Option<&str> {
        self.events.background_image()
    }

    /// Set the background image filename in the events section.
    pub fn set_background_filename(&mut self, filename: &str) {
        self.events.set_background_image(filename);
    }
}

/// Append one bracketed section, optionally followed by a blank line.
fn push_section(out: &mut String, name: &str, body: &str, blank_after: bool) {
    out.push('[');
    out.push_str(name);
    out.push_str("]\n");
    out.push_str(body);
    if blank_after {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = "osu file format v14\n\n[General]\nAudioFilename: audio.mp3\nAudioLeadIn: 0\nPreviewTime: 10000\nCountdown: 0\nSampleSet: Normal\nStackLeniency: 0.7\nMode: 0\nLetterboxInBreaks: 0\nWidescreenStoryboard: 0\n\n[Editor]\nBookmarks: 10000,20000\nDistanceSpacing: 1.2\nBeatDivisor: 4\nGridSize: 4\nTimelineZoom: 1\n\n[Metadata]\nTitle:Test Song\nTitleUnicode:Test Song\nArtist:Test Artist\nArtistUnicode:Test Artist\nCreator:Test Creator\nVersion:Normal\nSource:\nTags:test beatmap\nBeatmapID:0\nBeatmapSetID:-1\n\n[Difficulty]\nHPDrainRate:5\nCircleSize:4\nOverallDifficulty:5\nApproachRate:5\nSliderMultiplier:1.4\nSliderTickRate:1\n\n[Events]\n//Background and Video events\n0,0,\"bg.jpg\",0,0\n\n[TimingPoints]\n0,500,4,2,0,50,1,0\n10000,500,4,2,0,50,1,0\n\n[HitObjects]\n256,192,1000,1,0,0:0:0:0:\n100,100,2000,1,0,0:0:0:0:\n";

    const MINIMAL: &str = "osu file format v14\n\n[General]\nAudioFilename: audio.mp3\n\n[Metadata]\nTitle:Test\nArtist:Test\nCreator:Test\nVersion:Test\n\n[Difficulty]\nHPDrainRate:5\nCircleSize:4\nOverallDifficulty:5\nApproachRate:5\nSliderMultiplier:1.4\nSliderTickRate:1\n\n[Events]\n\n[HitObjects]\n";

    #[test]
    fn test_decode_sample() {
        let beatmap = Beatmap::decode(SAMPLE).unwrap();

        assert_eq!(beatmap.version, 14);
        assert_eq!(beatmap.metadata.title.as_deref(), Some("Test Song"));
        assert_eq!(beatmap.general.audio_filename.as_deref(), Some("audio.mp3"));
        assert_eq!(beatmap.difficulty.hp_drain_rate, Some(5.0));
        assert_eq!(beatmap.editor.as_ref().unwrap().beat_divisor, Some(4));
        assert_eq!(beatmap.timing_points.as_ref().unwrap().points.len(), 2);
        assert_eq!(beatmap.hit_objects.objects.len(), 2);
        assert_eq!(beatmap.background_filename(), Some("bg.jpg"));
    }

    #[test]
    fn test_decode_crlf_equivalent() {
        let crlf = SAMPLE.replace('\n', "\r\n");
        assert_eq!(Beatmap::decode(&crlf).unwrap(), Beatmap::decode(SAMPLE).unwrap());
    }

    #[test]
    fn test_optional_sections_absent() {
        let beatmap = Beatmap::decode(MINIMAL).unwrap();

        assert!(beatmap.editor.is_none());
        assert!(beatmap.colours.is_none());
        assert!(beatmap.timing_points.is_none());
        assert!(beatmap.events.lines.is_empty());
    }

    #[test]
    fn test_empty_document_fails() {
        assert!(matches!(
            Beatmap::decode("").unwrap_err(),
            BeatmapError::Structural(_)
        ));
        assert!(matches!(
            Beatmap::decode("\n\n\n").unwrap_err(),
            BeatmapError::Structural(_)
        ));
    }

    #[test]
    fn test_invalid_header_fails() {
        assert!(matches!(
            Beatmap::decode("This is not a valid beatmap file").unwrap_err(),
            BeatmapError::Structural(_)
        ));
    }

    #[test]
    fn test_missing_required_section_fails() {
        let no_objects = "osu file format v14\n\n[General]\nMode: 0\n\n[Metadata]\nTitle:x\n\n[Difficulty]\nHPDrainRate:5\n\n[Events]\n";
        assert!(matches!(
            Beatmap::decode(no_objects).unwrap_err(),
            BeatmapError::Structural(_)
        ));
    }

    #[test]
    fn test_encode_is_byte_faithful() {
        let beatmap = Beatmap::decode(SAMPLE).unwrap();
        assert_eq!(beatmap.encode(), SAMPLE);

        let minimal = Beatmap::decode(MINIMAL).unwrap();
        assert_eq!(minimal.encode(), MINIMAL);
    }

    #[test]
    fn test_round_trip_varied_records() {
        let timing_blocks = [
            "0,500,4,2,0,50,1,0\n",
            "0,480,3,1,0,60,1,0\n1000,-50,3,1,0,60,0,1\n",
            "0,333.33,4,2,0,70,1,8\n2000,-200,4,0,1,30,0,0\n2000,-100,4,0,1,30,0,0\n",
        ];
        let object_blocks = [
            "256,192,1000,1,0,0:0:0:0:\n",
            "256,192,1000.5,5,2,1:2:0:40:\n",
            "100,100,1000,2,0,B|200:200|250:200,1,140\n",
            "100,100,1000,2,0,L|200:100,1,100,0:0:0:70:\n",
            "36,68,4040,6,4,P|96:132|167:112,2,140,8|0|2,0:0|1:2|0:0,2:1:0:60:\n",
            "256,192,1000,8,0,2500,0:0:0:0:\n64,192,3000,128,0,4000:1:0:0:80:\n",
        ];

        for timing in &timing_blocks {
            for objects in &object_blocks {
                let doc = format!(
                    "osu file format v14\n\n[General]\nAudioFilename: audio.mp3\n\n[Metadata]\nTitle:T\nArtist:A\nCreator:C\nVersion:V\n\n[Difficulty]\nSliderMultiplier:1.4\n\n[Events]\n\n[TimingPoints]\n{timing}\n[HitObjects]\n{objects}"
                );
                let beatmap = Beatmap::decode(&doc).unwrap();
                assert_eq!(beatmap.encode(), doc, "byte round trip for {doc:?}");
                let reparsed = Beatmap::decode(&beatmap.encode()).unwrap();
                assert_eq!(reparsed, beatmap, "model round trip for {doc:?}");
            }
        }
    }

    #[test]
    fn test_encode_idempotent() {
        let beatmap = Beatmap::decode(SAMPLE).unwrap();
        let once = beatmap.encode();
        let twice = Beatmap::decode(&once).unwrap().encode();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_model_round_trip() {
        let beatmap = Beatmap::decode(SAMPLE).unwrap();
        let reparsed = Beatmap::decode(&beatmap.encode()).unwrap();
        assert_eq!(beatmap, reparsed);
    }

    #[test]
    fn test_modify_and_encode() {
        let mut beatmap = Beatmap::decode(SAMPLE).unwrap();
        beatmap.general.audio_filename = Some("new-audio.mp3".to_string());
        beatmap.metadata.version = Some("Hard".to_string());

        let encoded = beatmap.encode();
        assert!(encoded.contains("AudioFilename: new-audio.mp3"));
        assert!(encoded.contains("Version:Hard"));
    }

    #[test]
    fn test_queries_with_timing() {
        let beatmap = Beatmap::decode(SAMPLE).unwrap();
        assert_relative_eq!(beatmap.bpm_at(5000.0), 120.0);
        assert_eq!(beatmap.volume_at(5000.0), 50);
        assert!(beatmap.uninherited_at(5000.0).is_some());
        assert!(beatmap.inherited_at(5000.0).is_none());
        assert!(beatmap.hit_object_at(1000.0, 2.0).is_some());
    }

    #[test]
    fn test_queries_without_timing_fall_back() {
        let beatmap = Beatmap::decode(MINIMAL).unwrap();
        assert_relative_eq!(beatmap.bpm_at(0.0), 120.0);
        assert_relative_eq!(beatmap.bpm_at(123456.0), 120.0);
        assert_eq!(beatmap.volume_at(0.0), 100);
        assert!(beatmap.uninherited_at(0.0).is_none());
    }

    #[test]
    fn test_legacy_family_layout() {
        let legacy = SAMPLE.replace("osu file format v14", "osu file format v128");
        let beatmap = Beatmap::decode(&legacy).unwrap();
        assert_eq!(beatmap.format_version(), FormatVersion::V128);

        let encoded = beatmap.encode();
        assert!(encoded.starts_with("osu file format v128\n"));
        // no blank line between the events block and the next header
        assert!(encoded.contains("0,0,\"bg.jpg\",0,0\n[TimingPoints]"));
    }

    #[test]
    fn test_version_normalized_to_family_sentinel() {
        let old = SAMPLE.replace("osu file format v14", "osu file format v9");
        let beatmap = Beatmap::decode(&old).unwrap();
        assert_eq!(beatmap.version, 9);
        assert!(beatmap.encode().starts_with("osu file format v14\n"));
    }
}
