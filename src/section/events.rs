//! `[Events]` Section
//!
//! Background, break and storyboard event lines, preserved verbatim: the
//! storyboard language is whitespace-sensitive and outside this codec's
//! scope, so lines pass through untouched. Only the background-image
//! record (`0,0,"filename",x,y`) gets a typed accessor.

use serde::{Deserialize, Serialize};

/// Event lines stored exactly as read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventsSection {
    /// Raw event lines in file order
    pub lines: Vec<String>,
}

impl EventsSection {
    /// Take ownership of the section's raw lines.
    pub fn decode(lines: &[String]) -> Self {
        EventsSection {
            lines: lines.to_vec(),
        }
    }

    /// Encode the lines back, each newline-terminated.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// The background image filename, if a background event exists.
    pub fn background_image(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| {
            let mut fields = line.trim().split(',');
            if fields.next()? != "0" || fields.next()? != "0" {
                return None;
            }
            Some(fields.next()?.trim_matches('"'))
        })
    }

    /// Replace the background event's filename, or append a new background
    /// event when none exists.
    pub fn set_background_image(&mut self, filename: &str) {
        let record = format!("0,0,\"{filename}\",0,0");
        let existing = self.lines.iter_mut().find(|line| {
            let mut fields = line.trim().split(',');
            fields.next() == Some("0") && fields.next() == Some("0")
        });
        match existing {
            Some(line) => *line = record,
            None => self.lines.push(record),
        }
    }
}
