use std::fmt;
use std::str::FromStr;

use crate::error::CodelSizeParseError;
#[cfg(feature = "serde")]
use crate::error::ConfigError;

/// How many source pixels make up one codel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub enum CodelSize {
    /// Guess the size from the shortest color run in the source image.
    #[default]
    Auto,
    /// Use this size as given. A size of 1 keeps the image pixel-for-pixel.
    Fixed(u32),
}

impl fmt::Display for CodelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodelSize::Auto => f.write_str("auto"),
            CodelSize::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for CodelSize {
    type Err = CodelSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(CodelSize::Auto);
        }
        match s.parse::<u32>() {
            Ok(0) => Err(CodelSizeParseError::Zero),
            Ok(n) => Ok(CodelSize::Fixed(n)),
            Err(_) => Err(CodelSizeParseError::Invalid(s.to_string())),
        }
    }
}

impl From<CodelSize> for String {
    fn from(c: CodelSize) -> String {
        c.to_string()
    }
}

impl TryFrom<String> for CodelSize {
    type Error = CodelSizeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Grid loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridConfig {
    pub codel_size: CodelSize,
    /// Rendering size of one cell in screen pixels. Advisory only.
    pub pixel_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            codel_size: CodelSize::Auto,
            pixel_size: 1,
        }
    }
}

#[cfg(feature = "serde")]
impl GridConfig {
    /// Parse a config from TOML. Missing keys fall back to the defaults.
    pub fn from_toml(toml_str: &str) -> Result<GridConfig, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
