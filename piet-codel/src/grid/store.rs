use std::fmt;

use crate::color::Color;
use crate::config::{CodelSize, GridConfig};
use crate::error::GridError;

use super::estimate::estimate_codel_size;
use super::image::CodelImage;
use super::region::{region_cells, region_size};
use super::resample::downscale;

/// A single-cell edit, passed to the on-change hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub col: u32,
    pub row: u32,
    pub color: Color,
}

/// Outcome of [`GridStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LoadReport {
    pub source_width: u32,
    pub source_height: u32,
    /// The codel size actually applied.
    pub codel_size: u32,
    /// Whether `codel_size` was guessed from the image.
    pub estimated: bool,
    pub columns: u32,
    pub rows: u32,
}

type ChangeHook = Box<dyn FnMut(CellChange) + Send>;

/// The editable codel grid of a Piet program.
pub struct GridStore {
    image: CodelImage,
    pixel_size: u32,
    on_change: Option<ChangeHook>,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .field("pixel_size", &self.pixel_size)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Default for GridStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GridStore {
    /// An empty 0×0 grid.
    pub fn new() -> Self {
        Self {
            image: CodelImage::default(),
            pixel_size: GridConfig::default().pixel_size,
            on_change: None,
        }
    }

    /// A grid holding `image` cell-for-pixel.
    pub fn from_image(image: CodelImage) -> Self {
        Self {
            image,
            ..Self::new()
        }
    }

    /// Install the hook called after every successful single-cell edit.
    /// Replaces any previous hook.
    pub fn set_on_change(&mut self, hook: impl FnMut(CellChange) + Send + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Replace the whole grid with `source`, scaled so that one codel
    /// becomes one cell.
    pub fn load(&mut self, source: &CodelImage, codel_size: CodelSize) -> LoadReport {
        let (size, estimated) = match codel_size {
            CodelSize::Auto => {
                let guess = estimate_codel_size(source);
                log::debug!(
                    "estimated codel size {} for {}x{} image",
                    guess,
                    source.width,
                    source.height
                );
                (guess, true)
            }
            CodelSize::Fixed(n) => (n, false),
        };

        self.image = downscale(source, size);
        if self.image.is_empty() {
            log::debug!("loaded empty grid");
        }

        LoadReport {
            source_width: source.width,
            source_height: source.height,
            codel_size: size.max(1),
            estimated,
            columns: self.image.width,
            rows: self.image.height,
        }
    }

    /// [`load`](Self::load) with the config's codel size, adopting its
    /// pixel size hint.
    pub fn load_with_config(&mut self, source: &CodelImage, config: &GridConfig) -> LoadReport {
        self.pixel_size = config.pixel_size;
        self.load(source, config.codel_size)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// `(columns, rows)`; same as [`dimensions`](Self::dimensions).
    pub fn cell_count(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn check_bounds(&self, col: u32, row: u32) -> Result<(), GridError> {
        if self.image.in_bounds(col, row) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                col,
                row,
                width: self.image.width,
                height: self.image.height,
            })
        }
    }

    pub fn cell_color(&self, col: u32, row: u32) -> Result<Color, GridError> {
        self.check_bounds(col, row)?;
        Ok(self.image.get(col, row))
    }

    /// Overwrite one cell and notify the on-change hook. Out-of-bounds
    /// edits change nothing and notify nobody.
    pub fn set_cell_color(&mut self, col: u32, row: u32, color: Color) -> Result<(), GridError> {
        self.check_bounds(col, row)?;
        self.image.set(col, row, color);
        log::trace!("cell ({col}, {row}) set to {color}");
        if let Some(hook) = self.on_change.as_mut() {
            hook(CellChange { col, row, color });
        }
        Ok(())
    }

    /// Edit one cell from a textual color such as `#ffc0c0`.
    pub fn set_cell_value(&mut self, col: u32, row: u32, value: &str) -> Result<(), GridError> {
        self.check_bounds(col, row)?;
        let color = value.parse::<Color>()?;
        self.set_cell_color(col, row, color)
    }

    /// Size of the contiguous same-color block containing the cell.
    pub fn contiguous_size(&self, col: u32, row: u32) -> Result<u32, GridError> {
        self.check_bounds(col, row)?;
        Ok(region_size(&self.image, col, row))
    }

    /// Every cell of the contiguous block containing the cell, row-major.
    pub fn contiguous_cells(&self, col: u32, row: u32) -> Result<Vec<(u32, u32)>, GridError> {
        self.check_bounds(col, row)?;
        Ok(region_cells(&self.image, col, row))
    }

    /// Status line for a cell, e.g. `X:   3 Y:  12, contiguous: 4`.
    pub fn cell_status_text(&self, col: u32, row: u32) -> Result<String, GridError> {
        let n = self.contiguous_size(col, row)?;
        Ok(format!("X: {col:>3} Y: {row:>3}, contiguous: {n}"))
    }

    /// Row or column header text.
    pub fn header_label(&self, section: u32) -> String {
        section.to_string()
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn set_pixel_size(&mut self, size: u32) {
        self.pixel_size = size;
    }

    /// Suggested on-screen size of one cell.
    pub fn size_hint(&self) -> (u32, u32) {
        (self.pixel_size, self.pixel_size)
    }

    pub fn image(&self) -> &CodelImage {
        &self.image
    }

    pub fn into_image(self) -> CodelImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const A: Color = Color::rgb(0xff, 0xff, 0xc0);
    const B: Color = Color::rgb(0x00, 0x00, 0xc0);

    fn two_by_two() -> GridStore {
        GridStore::from_image(CodelImage::from_buf(2, 2, vec![A, A, B, A]).unwrap())
    }

    #[test]
    fn new_store_is_empty() {
        let store = GridStore::new();
        assert_eq!(store.cell_count(), (0, 0));
        assert!(matches!(
            store.cell_color(0, 0),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(store.pixel_size(), 1);
    }

    #[test]
    fn set_then_get() {
        let mut store = two_by_two();
        store.set_cell_color(1, 1, B).unwrap();
        assert_eq!(store.cell_color(1, 1), Ok(B));
        assert_eq!(store.cell_color(0, 0), Ok(A));
    }

    #[test]
    fn out_of_bounds_edit_changes_nothing() {
        let mut store = two_by_two();
        let before = store.image().clone();
        let err = store.set_cell_color(2, 0, B).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                col: 2,
                row: 0,
                width: 2,
                height: 2
            }
        );
        assert_eq!(store.image(), &before);
    }

    #[test]
    fn hook_sees_exactly_the_edited_cell() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = two_by_two();
        let sink = Arc::clone(&seen);
        store.set_on_change(move |change| sink.lock().unwrap().push(change));

        store.set_cell_color(0, 1, A).unwrap();
        assert!(store.set_cell_color(9, 9, A).is_err());
        assert!(store.set_cell_value(0, 0, "not a color").is_err());

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![CellChange {
                col: 0,
                row: 1,
                color: A
            }]
        );
    }

    #[test]
    fn cleared_hook_is_not_called() {
        let count = Arc::new(Mutex::new(0));
        let mut store = two_by_two();
        let sink = Arc::clone(&count);
        store.set_on_change(move |_| *sink.lock().unwrap() += 1);
        store.clear_on_change();
        store.set_cell_color(0, 0, B).unwrap();
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn set_cell_value_parses_color() {
        let mut store = two_by_two();
        store.set_cell_value(1, 0, "#0000c0").unwrap();
        assert_eq!(store.cell_color(1, 0), Ok(B));
    }

    #[test]
    fn set_cell_value_rejects_garbage() {
        let mut store = two_by_two();
        let err = store.set_cell_value(1, 0, "#zz").unwrap_err();
        assert!(matches!(err, GridError::InvalidValue(_)));
        assert_eq!(store.cell_color(1, 0), Ok(A));
    }

    #[test]
    fn status_text_format() {
        let store = two_by_two();
        assert_eq!(
            store.cell_status_text(1, 1).unwrap(),
            "X:   1 Y:   1, contiguous: 3"
        );
        assert_eq!(
            store.cell_status_text(0, 1).unwrap(),
            "X:   0 Y:   1, contiguous: 1"
        );
        assert!(store.cell_status_text(0, 2).is_err());
    }

    #[test]
    fn status_text_wide_coordinates() {
        let store = GridStore::from_image(CodelImage::new(1200, 1, A));
        assert_eq!(
            store.cell_status_text(1024, 0).unwrap(),
            "X: 1024 Y:   0, contiguous: 1200"
        );
    }

    #[test]
    fn edits_change_contiguous_size() {
        let mut store = two_by_two();
        assert_eq!(store.contiguous_size(0, 0), Ok(3));
        store.set_cell_color(0, 1, A).unwrap();
        assert_eq!(store.contiguous_size(0, 0), Ok(4));
        store.set_cell_color(1, 0, B).unwrap();
        assert_eq!(store.contiguous_size(0, 0), Ok(3));
        assert_eq!(store.contiguous_cells(1, 0), Ok(vec![(1, 0)]));
    }

    #[test]
    fn load_replaces_grid() {
        let mut store = two_by_two();
        let report = store.load(&CodelImage::new(9, 6, B), CodelSize::Fixed(3));
        assert_eq!(store.cell_count(), (3, 2));
        assert_eq!((report.columns, report.rows), (3, 2));
        assert_eq!(report.codel_size, 3);
        assert!(!report.estimated);
    }

    #[test]
    fn load_auto_reports_estimate() {
        let codels = CodelImage::from_buf(2, 1, vec![A, B]).unwrap();
        let mut store = GridStore::new();
        let report = store.load(&codels.upscale(4).unwrap(), CodelSize::Auto);
        assert!(report.estimated);
        assert_eq!(report.codel_size, 4);
        assert_eq!(store.image(), &codels);
    }

    #[test]
    fn load_with_config_sets_pixel_size() {
        let mut store = GridStore::new();
        let config = GridConfig {
            codel_size: CodelSize::Fixed(1),
            pixel_size: 16,
        };
        store.load_with_config(&CodelImage::new(2, 3, A), &config);
        assert_eq!(store.size_hint(), (16, 16));
        assert_eq!(store.cell_count(), (2, 3));
    }

    #[test]
    fn header_is_section_number() {
        assert_eq!(GridStore::new().header_label(42), "42");
    }

    #[test]
    fn shared_store_across_threads() {
        let store = Arc::new(Mutex::new(two_by_two()));
        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                store.lock().unwrap().set_cell_color(0, 1, A).unwrap();
            })
        };
        writer.join().unwrap();
        assert_eq!(store.lock().unwrap().contiguous_size(1, 1), Ok(4));
    }
}
