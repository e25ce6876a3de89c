use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CaptionError, CaptionResult};
use crate::text::wrap::DEFAULT_FILL_RATIO;

/// Font sizes, spacing and colors used when burning captions into a comic.
///
/// Font sizes are given for a 1x image and multiplied by the download scaling factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionStyle {
    pub title_font_px: f32,
    pub alt_font_px: f32,
    pub line_padding_px: u32,
    pub wrap_fill_ratio: f32,
    /// Straight-alpha RGBA text color.
    pub foreground: [u8; 4],
    /// Straight-alpha RGBA fill for the rows added above and below the comic.
    pub background: [u8; 4],
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            title_font_px: 28.0,
            alt_font_px: 18.0,
            line_padding_px: 5,
            wrap_fill_ratio: DEFAULT_FILL_RATIO,
            foreground: [255, 255, 255, 255],
            background: [0, 0, 0, 255],
        }
    }
}

impl CaptionStyle {
    /// Load a style from a JSON file. Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CaptionError::config(format!("read style '{}': {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> CaptionResult<Self> {
        let style: Self = serde_json::from_str(raw)
            .map_err(|e| CaptionError::config(format!("parse style json: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> CaptionResult<()> {
        for (name, v) in [
            ("title_font_px", self.title_font_px),
            ("alt_font_px", self.alt_font_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(CaptionError::config(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
        }
        if !self.wrap_fill_ratio.is_finite()
            || self.wrap_fill_ratio <= 0.0
            || self.wrap_fill_ratio > 1.0
        {
            return Err(CaptionError::config(format!(
                "wrap_fill_ratio must be in (0, 1] (got {})",
                self.wrap_fill_ratio
            )));
        }
        Ok(())
    }

    pub fn title_px(&self, scaling: u32) -> f32 {
        self.title_font_px * scaling.max(1) as f32
    }

    pub fn alt_px(&self, scaling: u32) -> f32 {
        self.alt_font_px * scaling.max(1) as f32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/style.rs"]
mod tests;
