//! Validated raster input.

use crate::error::{JpegEncodeError, Result};

/// Largest width or height that fits the 16-bit SOF0 fields.
pub const MAX_DIMENSION: usize = u16::MAX as usize;

/// Byte order of the three channels of a pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PixelOrder {
    /// Red, green, blue: the layout ordinary decoders produce.
    #[default]
    Rgb,
    /// Blue, green, red: the layout of 24-bit BMP pixel rows.
    Bgr,
}

impl PixelOrder {
    /// Split a pixel triple into `(r, g, b)`.
    #[inline]
    pub fn rgb(self, pixel: &[u8]) -> (u8, u8, u8) {
        match self {
            PixelOrder::Rgb => (pixel[0], pixel[1], pixel[2]),
            PixelOrder::Bgr => (pixel[2], pixel[1], pixel[0]),
        }
    }
}

/// A 24-bit raster image with block-aligned dimensions.
///
/// Pixels are stored row-major, top-to-bottom, three bytes per pixel in
/// `order`, with no padding between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    order: PixelOrder,
    pixels: Vec<u8>,
}

impl Image {
    /// Wrap a pixel buffer after checking the encoder's input contract.
    ///
    /// Width and height must be positive multiples of 8 no larger than 65535,
    /// and the buffer must hold exactly `width * height * 3` bytes.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>, order: PixelOrder) -> Result<Self> {
        validate_dimensions(width, height)?;

        let expected = width * height * 3;
        if pixels.len() != expected {
            return Err(JpegEncodeError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Image {
            width,
            height,
            order,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> PixelOrder {
        self.order
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of 8x8 blocks horizontally.
    pub fn blocks_wide(&self) -> usize {
        self.width / 8
    }

    /// Number of 8x8 blocks vertically.
    pub fn blocks_tall(&self) -> usize {
        self.height / 8
    }

    /// The 8 pixel triples of row `row` (0-7) of block `(block_row, block_col)`.
    #[inline]
    pub fn block_row(&self, block_row: usize, block_col: usize, row: usize) -> &[u8] {
        let y = block_row * 8 + row;
        let start = (y * self.width + block_col * 8) * 3;
        &self.pixels[start..start + 24]
    }
}

/// Check that `width`/`height` can be encoded without padding.
pub fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    let valid = |d: usize| d > 0 && d % 8 == 0 && d <= MAX_DIMENSION;
    if !valid(width) || !valid(height) {
        return Err(JpegEncodeError::InvalidDimensions { width, height });
    }
    Ok(())
}
