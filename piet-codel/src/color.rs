use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;

/// A codel color packed as `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Fully opaque color from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Components in `[r, g, b, a]` order, as most image buffers lay them out.
    pub const fn to_rgba_array(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    pub const fn from_rgba_array(px: [u8; 4]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a() == 0xff {
            write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
        } else {
            write!(f, "#{:08x}", self.0)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parses `#rgb`, `#rrggbb` or `#aarrggbb`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }
        if !matches!(hex.len(), 3 | 6 | 8) {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))?;

        match hex.len() {
            3 => {
                // Each nibble doubles: #f80 -> #ff8800
                let r = ((value >> 8) & 0xf) as u8 * 0x11;
                let g = ((value >> 4) & 0xf) as u8 * 0x11;
                let b = (value & 0xf) as u8 * 0x11;
                Ok(Color::rgb(r, g, b))
            }
            6 => Ok(Color(0xff00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(ColorParseError::BadLength(s.to_string())),
        }
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
