use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SvgDrawOptions {
    #[serde(default)]
    pub theme: SvgLayoutThemes,
    /// Writes the item index inside every footprint
    pub labels: bool,
    /// Draws the footprint available to the layer when it differs from the container (overhang)
    pub overhang: bool,
}

impl Default for SvgDrawOptions {
    fn default() -> Self {
        Self {
            theme: SvgLayoutThemes::default(),
            labels: false,
            overhang: true,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize, Default)]
pub enum SvgLayoutThemes {
    #[default]
    EarthTones,
    Gray,
}

impl SvgLayoutThemes {
    pub fn theme(&self) -> SvgLayoutTheme {
        match self {
            SvgLayoutThemes::EarthTones => EARTH_TONES_THEME,
            SvgLayoutThemes::Gray => GRAY_THEME,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SvgLayoutTheme {
    pub stroke_width_multiplier: f64,
    pub container_fill: Color,
    pub item_fill: Color,
    pub overhang_stroke: Color,
}

pub const EARTH_TONES_THEME: SvgLayoutTheme = SvgLayoutTheme {
    stroke_width_multiplier: 2.0,
    container_fill: Color(0xCC, 0x82, 0x4A),
    item_fill: Color(0xFF, 0xC8, 0x79),
    overhang_stroke: Color(0x2D, 0x2D, 0x2D),
};

pub const GRAY_THEME: SvgLayoutTheme = SvgLayoutTheme {
    stroke_width_multiplier: 2.5,
    container_fill: Color(0xC3, 0xC3, 0xC3),
    item_fill: Color(0x8F, 0x8F, 0x8F),
    overhang_stroke: Color(0x63, 0x63, 0x63),
};

/// RGB color, written as `#RRGGBB`
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub fn change_brightness(self, fraction: f64) -> Color {
        let scale = |c: u8| (c as f64 * fraction).clamp(0.0, 255.0) as u8;
        Color(scale(self.0), scale(self.1), scale(self.2))
    }

    pub fn blend(self, other: Color) -> Color {
        let mix = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Color(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        ensure!(hex.len() == 6 && hex.is_ascii(), "invalid color: {s:?}");
        Ok(Color(
            u8::from_str_radix(&hex[0..2], 16)?,
            u8::from_str_radix(&hex[2..4], 16)?,
            u8::from_str_radix(&hex[4..6], 16)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_text_round_trip() {
        let c: Color = "#FFC879".parse().unwrap();
        assert_eq!(c, Color(0xFF, 0xC8, 0x79));
        assert_eq!(c.to_string(), "#FFC879");
        assert!("#FFC8".parse::<Color>().is_err());
    }

    #[test]
    fn darker_color() {
        assert_eq!(Color(200, 100, 50).change_brightness(0.5), Color(100, 50, 25));
        assert_eq!(Color(0, 0, 0).blend(Color(200, 100, 50)), Color(100, 50, 25));
    }
}
