//! Chord wheel palette and legible text colors

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pitch::PitchClass;
use crate::error::{ChordwheelError, Result};

/// 24-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or the short `#rgb` form
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || ChordwheelError::InvalidColor(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Build from hue (degrees), saturation and lightness (0.0-1.0)
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// WCAG relative luminance (0.0 black .. 1.0 white)
    pub fn relative_luminance(&self) -> f64 {
        let linear = |channel: u8| {
            let v = channel as f64 / 255.0;
            if v <= 0.03928 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ChordwheelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ChordwheelError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

const WHEEL_SATURATION: f64 = 0.65;
const WHEEL_LIGHTNESS: f64 = 0.55;

/// Luminance above which dark text reads better than light text
const LUMINANCE_THRESHOLD: f64 = 0.179;

/// Wheel color for a single pitch class
pub fn wheel_color(pitch_class: PitchClass) -> Color {
    let hue = pitch_class.fifths_index() as f64 * 30.0;
    Color::from_hsl(hue, WHEEL_SATURATION, WHEEL_LIGHTNESS)
}

/// One hue per pitch class, laid out around the circle of fifths
pub fn wheel_colors() -> BTreeMap<PitchClass, Color> {
    PitchClass::ALL
        .into_iter()
        .map(|pc| (pc, wheel_color(pc)))
        .collect()
}

/// Black or white, whichever is legible on `background`
pub fn contrasting_text_color(background: Color) -> Color {
    if background.relative_luminance() > LUMINANCE_THRESHOLD {
        Color::BLACK
    } else {
        Color::WHITE
    }
}
