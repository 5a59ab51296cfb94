pub mod error;
pub mod color;
pub mod config;
pub mod grid;

pub use color::Color;
pub use config::{CodelSize, GridConfig};
pub use error::GridError;
pub use grid::image::CodelImage;
pub use grid::store::{CellChange, GridStore, LoadReport};
