use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        col: u32,
        row: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid cell value: {0}")]
    InvalidValue(#[from] ColorParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color string is empty")]
    Empty,

    #[error("color '{0}' must have 3, 6 or 8 hex digits")]
    BadLength(String),

    #[error("invalid hex digit in color '{0}'")]
    BadDigit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("{width}x{height} image scaled by {scale} is too large")]
    TooLarge { width: u32, height: u32, scale: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodelSizeParseError {
    #[error("codel size must be 'auto' or a positive integer, got '{0}'")]
    Invalid(String),

    #[error("codel size must be at least 1")]
    Zero,
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid grid config: {0}")]
    Parse(String),
}
