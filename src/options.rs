use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_COLORMAP: &str = "viridis";

/// Default window size in inches.
pub const DEFAULT_FIGURE_SIZE: (f32, f32) = (5.0, 5.0);

/// Screen pixels per figure inch.
pub const PIXELS_PER_INCH: f32 = 100.0;

// ---------------------------------------------------------------------------
// Display options
// ---------------------------------------------------------------------------

/// How a grid should be prepared and drawn. Passed explicitly to every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Percentile to clip from both ends of the value distribution.
    /// `None` or zero disables clipping; valid values lie in `(0, 50)`.
    pub clip_percentile: Option<f64>,

    /// Colormap for single-channel grids. Ignored for colour grids.
    pub colormap: String,

    pub title: String,

    /// Window size in inches, `(width, height)`.
    pub figure_size: (f32, f32),
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clip_percentile: None,
            colormap: DEFAULT_COLORMAP.to_string(),
            title: String::new(),
            figure_size: DEFAULT_FIGURE_SIZE,
        }
    }
}

impl DisplayOptions {
    /// Read options from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| Error::format(path, e))
    }

    pub fn with_clip(mut self, percentile: f64) -> Self {
        self.clip_percentile = Some(percentile);
        self
    }

    pub fn with_colormap(mut self, name: impl Into<String>) -> Self {
        self.colormap = name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Window size in screen pixels.
    pub fn window_size(&self) -> [f32; 2] {
        let (w, h) = self.figure_size;
        [w * PIXELS_PER_INCH, h * PIXELS_PER_INCH]
    }
}

/// Parse a clip percentile given as text, e.g. on the command line.
pub fn parse_clip(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(p) if !p.is_nan() => Ok(p),
        _ => Err(Error::Type(format!(
            "percentile clip needs to be a number but was given '{text}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = DisplayOptions::default();
        assert_eq!(opts.clip_percentile, None);
        assert_eq!(opts.colormap, "viridis");
        assert_eq!(opts.title, "");
        assert_eq!(opts.window_size(), [500.0, 500.0]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: DisplayOptions = serde_json::from_str(r#"{"colormap": "magma"}"#).unwrap();
        assert_eq!(opts.colormap, "magma");
        assert_eq!(opts.figure_size, DEFAULT_FIGURE_SIZE);
    }

    #[test]
    fn clip_text_must_be_numeric() {
        assert_eq!(parse_clip("2").unwrap(), 2.0);
        assert_eq!(parse_clip(" 0.5 ").unwrap(), 0.5);
        assert!(matches!(parse_clip("lots"), Err(Error::Type(_))));
        assert!(matches!(parse_clip("nan"), Err(Error::Type(_))));
    }
}
