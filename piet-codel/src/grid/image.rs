use crate::color::Color;
use crate::error::ImageError;

/// Color raster with row-major pixel data.
///
/// Used both for decoded source images and as the codel grid itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodelImage {
    pub width: u32,
    pub height: u32,
    pub buf: Vec<Color>,
}

impl CodelImage {
    /// Create a new image filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let buf = vec![fill; width as usize * height as usize];
        Self { width, height, buf }
    }

    /// Create an image from existing pixel data.
    ///
    /// `buf` must contain exactly `width * height` colors.
    pub fn from_buf(width: u32, height: u32, buf: Vec<Color>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize;
        if buf.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: buf.len(),
            });
        }
        Ok(Self { width, height, buf })
    }

    /// Create an image from packed RGBA bytes (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let buf = bytes
            .chunks_exact(4)
            .map(|px| Color::from_rgba_array([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(Self { width, height, buf })
    }

    /// Packed RGBA bytes, 4 per pixel, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.buf.iter().flat_map(|c| c.to_rgba_array()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel value at (x, y). Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.buf[self.index(x, y)]
    }

    /// Get the pixel value at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn try_get(&self, x: u32, y: u32) -> Option<Color> {
        self.in_bounds(x, y).then(|| self.get(x, y))
    }

    /// Set the pixel value at (x, y). Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, val: Color) {
        let i = self.index(x, y);
        self.buf[i] = val;
    }

    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.index(0, y);
        &self.buf[start..start + self.width as usize]
    }

    /// Pixels of column `x`, top to bottom.
    pub fn column(&self, x: u32) -> impl Iterator<Item = Color> + '_ {
        (0..self.height).map(move |y| self.get(x, y))
    }

    /// Enlarge every pixel to a `scale`×`scale` block.
    ///
    /// Fails if the enlarged image would not fit in `u32` dimensions.
    pub fn upscale(&self, scale: u32) -> Result<CodelImage, ImageError> {
        if scale <= 1 {
            return Ok(self.clone());
        }
        let too_large = || ImageError::TooLarge {
            width: self.width,
            height: self.height,
            scale,
        };
        let out_w = self.width.checked_mul(scale).ok_or_else(too_large)?;
        let out_h = self.height.checked_mul(scale).ok_or_else(too_large)?;
        (out_w as usize)
            .checked_mul(out_h as usize)
            .ok_or_else(too_large)?;

        let mut out = CodelImage::new(out_w, out_h, Color::BLACK);
        for y in 0..out.height {
            for x in 0..out.width {
                out.set(x, y, self.get(x / scale, y / scale));
            }
        }
        Ok(out)
    }
}
