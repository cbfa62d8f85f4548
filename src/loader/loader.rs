//! Beatmap File Loader
//!
//! Reads chart files from disk and hands their text to the decoder.

use crate::{Beatmap, DecodeOptions, Result};
use std::fs;

/// Loads beatmap files from disk
pub struct BeatmapLoader;

impl BeatmapLoader {
    /// Load and decode a `.osu` file with default options.
    pub fn load(path: &str) -> Result<Beatmap> {
        Self::load_with(path, DecodeOptions::default())
    }

    /// Load and decode a `.osu` file.
    pub fn load_with(path: &str, options: DecodeOptions) -> Result<Beatmap> {
        let text = fs::read_to_string(path)?;
        Beatmap::decode_with(&text, options)
    }

    /// Encode a beatmap and write it back to disk.
    pub fn save(beatmap: &Beatmap, path: &str) -> Result<()> {
        fs::write(path, beatmap.encode())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = BeatmapLoader::load("/nonexistent/chart.osu").unwrap_err();
        assert!(matches!(err, crate::BeatmapError::Io(_)));
    }
}
