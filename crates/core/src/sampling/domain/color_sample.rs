use std::fmt;

use serde::{Serialize, Serializer};

use crate::shared::constants::FALLBACK_RGB;

/// Result of sampling one region.
///
/// Keeps "we measured this" apart from "we substituted the fallback",
/// even though both render to a plain hex color downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSample {
    Average([u8; 3]),
    Fallback,
}

impl ColorSample {
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ColorSample::Average(rgb) => *rgb,
            ColorSample::Fallback => FALLBACK_RGB,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ColorSample::Fallback)
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for ColorSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}
