//! Hit Sample Descriptor
//!
//! The colon-separated sub-record closing most hit-object lines:
//! `normalSet:additionSet:index:volume:filename`. Every field is optional
//! on the wire; an absent descriptor means "all defaults".

use serde::{Deserialize, Serialize};

/// Per-object sample overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HitSample {
    /// Sample set of the normal sound (0 = inherit from timing point)
    pub normal_set: u32,
    /// Sample set of the whistle/finish/clap sounds
    pub addition_set: u32,
    /// Custom sample index (0 = inherit from timing point)
    pub index: u32,
    /// Sample volume 1-100 (0 = inherit from timing point)
    pub volume: u32,
    /// Custom sample filename for the addition sound
    pub filename: Option<String>,
}

impl HitSample {
    /// Decode a colon-separated descriptor, defaulting every absent or
    /// malformed field. Never fails: irregular descriptors are a tolerated
    /// real-world divergence.
    pub fn decode(field: &str) -> Self {
        let mut parts = field.split(':');
        let mut next_num = |parts: &mut std::str::Split<'_, char>| {
            parts
                .next()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0)
        };

        let normal_set = next_num(&mut parts);
        let addition_set = next_num(&mut parts);
        let index = next_num(&mut parts);
        let volume = next_num(&mut parts);
        let filename = parts.next().filter(|s| !s.is_empty()).map(str::to_string);

        HitSample {
            normal_set,
            addition_set,
            index,
            volume,
            filename,
        }
    }

    /// Encode back into `normalSet:additionSet:index:volume:filename`,
    /// leaving the filename slot empty when none is set.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.normal_set,
            self.addition_set,
            self.index,
            self.volume,
            self.filename.as_deref().unwrap_or("")
        )
    }
}
