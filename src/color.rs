// ============================================================================
// COLOR CONFIGURATION
// ============================================================================

use palette::rgb::FromHexError;
use palette::{FromColor, Hsv, Srgb};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid hex colour {input:?}: {source}")]
pub struct ColorParseError {
    pub input: String,
    #[source]
    pub source: FromHexError,
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        hex.parse::<Srgb<u8>>()
            .map(Self::from)
            .map_err(|source| ColorParseError {
                input: hex.to_string(),
                source,
            })
    }

    /// Lower-case `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:x}", Srgb::<u8>::from(self))
    }

    /// Returns `(hue, saturation, value)` with hue in degrees `[0, 360)` and
    /// saturation/value in `[0, 1]`.
    pub fn to_hsv(self) -> (f64, f64, f64) {
        let hsv: Hsv = Hsv::from_color(Srgb::<u8>::from(self).into_format::<f32>());
        (
            f64::from(hsv.hue.into_positive_degrees()),
            f64::from(hsv.saturation),
            f64::from(hsv.value),
        )
    }

    /// Inverse of [`Color::to_hsv`]. Channels are truncated, not rounded.
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let hsv: Hsv = Hsv::new(h as f32, s as f32, v as f32);
        let rgb: Srgb = Srgb::from_color(hsv);
        let to_byte = |channel: f32| (channel * 255.0).clamp(0.0, 255.0) as u8;
        Self::new(to_byte(rgb.red), to_byte(rgb.green), to_byte(rgb.blue))
    }
}

/// Bulb colour for a brightness level: red and green stay saturated while
/// blue rises from 100 to 255.
pub fn brightness_color(brightness: f64) -> Color {
    let b = (100.0 + brightness * 155.0).clamp(0.0, 255.0) as u8;
    Color::new(255, 255, b)
}
