use eframe::egui::Color32;
use palette::{Hsv, IntoColor, Srgb};

use crate::error::{Error, Result};

/// Names accepted by [`Colormap::from_name`], default first.
pub const COLORMAP_NAMES: &[&str] = &[
    "viridis", "inferno", "magma", "plasma", "cividis", "turbo", "rainbow", "sinebow",
    "spectral", "greys", "gray", "hsv",
];

/// Number of entries in a colormap lookup table, one per byte value.
const LUT_SIZE: usize = 256;

// ---------------------------------------------------------------------------
// Colour mapping: byte value → Color32
// ---------------------------------------------------------------------------

/// Maps single-channel byte values (`0..=255`) to colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    lut: Vec<Color32>,
}

impl Colormap {
    /// Look up a colormap by (case-insensitive) name.
    pub fn from_name(name: &str) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();
        let lut = match key.as_str() {
            "viridis" => gradient_lut(&colorgrad::viridis()),
            "inferno" => gradient_lut(&colorgrad::inferno()),
            "magma" => gradient_lut(&colorgrad::magma()),
            "plasma" => gradient_lut(&colorgrad::plasma()),
            "cividis" => gradient_lut(&colorgrad::cividis()),
            "turbo" => gradient_lut(&colorgrad::turbo()),
            "rainbow" => gradient_lut(&colorgrad::rainbow()),
            "sinebow" => gradient_lut(&colorgrad::sinebow()),
            "spectral" => gradient_lut(&colorgrad::spectral()),
            "greys" => gradient_lut(&colorgrad::greys()),
            "gray" | "grey" => lut_from_fn(|t| Color32::from_gray(to_byte(t * 255.0))),
            "hsv" => lut_from_fn(hsv_color),
            _ => return Err(Error::Colormap(name.to_string())),
        };
        Ok(Colormap { name: key, lut })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colour for a display value; clamped to `0..=255` and rounded first.
    pub fn color_for(&self, value: f64) -> Color32 {
        self.lut[to_byte(value) as usize]
    }

    /// All colours from low to high, for drawing a colour bar.
    pub fn entries(&self) -> &[Color32] {
        &self.lut
    }
}

/// Round and saturate a display value to a byte. NaN maps to zero.
pub fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn gradient_lut(gradient: &colorgrad::Gradient) -> Vec<Color32> {
    lut_from_fn(|t| {
        let [r, g, b, _] = gradient.at(t).to_rgba8();
        Color32::from_rgb(r, g, b)
    })
}

fn lut_from_fn(f: impl Fn(f64) -> Color32) -> Vec<Color32> {
    (0..LUT_SIZE)
        .map(|i| f(i as f64 / (LUT_SIZE - 1) as f64))
        .collect()
}

/// Full-saturation hue wheel, red at both ends.
fn hsv_color(t: f64) -> Color32 {
    let hsv = Hsv::new(t as f32 * 360.0, 1.0, 1.0);
    let rgb: Srgb = hsv.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in COLORMAP_NAMES {
            let cmap = Colormap::from_name(name).unwrap();
            assert_eq!(cmap.entries().len(), LUT_SIZE);
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Colormap::from_name("Viridis").unwrap().name(), "viridis");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            Colormap::from_name("not-a-colormap"),
            Err(Error::Colormap(_))
        ));
    }

    #[test]
    fn gray_is_identity() {
        let gray = Colormap::from_name("gray").unwrap();
        assert_eq!(gray.color_for(0.0), Color32::from_gray(0));
        assert_eq!(gray.color_for(128.0), Color32::from_gray(128));
        assert_eq!(gray.color_for(255.0), Color32::from_gray(255));
    }

    #[test]
    fn out_of_range_values_saturate() {
        assert_eq!(to_byte(-10.0), 0);
        assert_eq!(to_byte(300.0), 255);
        assert_eq!(to_byte(127.6), 128);
        assert_eq!(to_byte(f64::NAN), 0);
    }
}
