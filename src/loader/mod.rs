//! Beatmap File Loader Domain
//!
//! Handles file I/O for reading `.osu` charts from disk; the codec itself
//! only ever sees in-memory text.

pub mod loader;

pub use loader::BeatmapLoader;

use crate::{Beatmap, Result};

/// Convenience function to load and decode a beatmap file from disk
pub fn load_file(path: &str) -> Result<Beatmap> {
    BeatmapLoader::load(path)
}
