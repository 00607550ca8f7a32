//! CSS-style colors used by the style tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MapError;

/// An 8-bit sRGB color with alpha.
///
/// Serialized as a CSS string (`#rrggbb` or `#rrggbbaa`) and parsed from
/// hex shorthands, named colors or `hsl(h, s%, l%)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from hue (degrees, any range), saturation and
    /// lightness (both in `[0, 1]`).
    pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let [r, g, b] = hsl_to_rgb(hue, saturation, lightness);
        Self::rgb(r, g, b)
    }

    /// RGB channels without alpha.
    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Hex notation, dropping the alpha byte when fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| MapError::InvalidColor(s.to_string()));
        }
        if let Some(args) = s
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_hsl(args).ok_or_else(|| MapError::InvalidColor(s.to_string()));
        }
        named_color(s).ok_or_else(|| MapError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_hsl(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let hue: f64 = parts[0].parse().ok()?;
    let percent = |p: &str| -> Option<f64> {
        let v: f64 = p.strip_suffix('%')?.trim().parse().ok()?;
        Some((v / 100.0).clamp(0.0, 1.0))
    };
    Some(Color::hsl(hue, percent(parts[1])?, percent(parts[2])?))
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// HSL to 8-bit RGB, hue in degrees (wrapped into `[0, 360)`).
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let t2 = if lightness <= 0.5 {
        lightness * (saturation + 1.0)
    } else {
        lightness + saturation - lightness * saturation
    };
    let t1 = lightness * 2.0 - t2;
    let sector = hue.rem_euclid(360.0) / 60.0;

    let channel = |h: f64| (hue_to_channel(t1, t2, h) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(sector + 2.0), channel(sector), channel(sector - 2.0)]
}

fn hue_to_channel(t1: f64, t2: f64, mut h: f64) -> f64 {
    if h < 0.0 {
        h += 6.0;
    }
    if h >= 6.0 {
        h -= 6.0;
    }
    if h < 1.0 {
        (t2 - t1) * h + t1
    } else if h < 3.0 {
        t2
    } else if h < 4.0 {
        (t2 - t1) * (4.0 - h) + t1
    } else {
        t1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!("#6af".parse::<Color>().unwrap(), Color::rgb(0x66, 0xaa, 0xff));
        assert_eq!(
            "#aa03".parse::<Color>().unwrap(),
            Color::rgba(0xaa, 0xaa, 0x00, 0x33)
        );
        assert_eq!("#FF5500".parse::<Color>().unwrap(), Color::rgb(255, 85, 0));
        assert_eq!(
            "#00000028".parse::<Color>().unwrap(),
            Color::rgba(0, 0, 0, 0x28)
        );
        assert!("#GGG".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_named_colors() {
        assert_eq!("gray".parse::<Color>().unwrap(), Color::rgb(128, 128, 128));
        assert_eq!("White".parse::<Color>().unwrap(), Color::WHITE);
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_hsl() {
        assert_eq!(Color::hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
        // Negative hues wrap around the wheel
        assert_eq!(Color::hsl(-120.0, 1.0, 0.5), Color::hsl(240.0, 1.0, 0.5));
        assert_eq!(
            "hsl(120, 100%, 50%)".parse::<Color>().unwrap(),
            Color::rgb(0, 255, 0)
        );
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let json = serde_json::to_string(&Color::rgba(0, 0x22, 0, 0x66)).unwrap();
        assert_eq!(json, "\"#00220066\"");
        let back: Color = serde_json::from_str("\"#0206\"").unwrap();
        assert_eq!(back, Color::rgba(0, 0x22, 0, 0x66));
    }
}
