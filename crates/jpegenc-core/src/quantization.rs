//! Quality-scaled quantization tables.

use crate::error::{JpegEncodeError, Result};
use crate::tables::{NATURAL_TO_ZIGZAG, STD_CHROMINANCE_QUANT, STD_LUMINANCE_QUANT};

/// Lowest scale factor applied to the standard tables.
pub const MIN_SCALE: i32 = 1;
/// Highest scale factor applied to the standard tables.
pub const MAX_SCALE: i32 = 99;

/// Quality setting as accepted from callers, 1..=100.
///
/// The value scales the standard tables: larger values quantize coarser, and
/// 50 halves the standard table. Scaling clamps it to 1..=99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 100;

    pub fn new(value: i32) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(JpegEncodeError::InvalidQuality(value));
        }
        Ok(Quality(value as u8))
    }

    pub fn value(self) -> i32 {
        self.0 as i32
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(50)
    }
}

impl TryFrom<i32> for Quality {
    type Error = JpegEncodeError;

    fn try_from(value: i32) -> Result<Self> {
        Quality::new(value)
    }
}

/// A JPEG quantization table (8x8 = 64 values).
///
/// Values are stored in zigzag order, the same layout the block transformer
/// produces coefficients in and the layout DQT carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationTable {
    /// Table ID written in DQT and referenced from SOF0 (0 = luminance, 1 = chrominance).
    pub id: u8,
    /// Quantization values in zigzag order, each in 1..=255.
    pub values: [u8; 64],
}

impl QuantizationTable {
    /// Scale a natural-order standard table by `quality` percent.
    ///
    /// `quality` is clamped to 1..=99 first. Each entry becomes
    /// `(standard * quality + 50) / 100`, clamped to 1..=255, and is stored at
    /// its zigzag position.
    pub fn scaled(id: u8, standard: &[u8; 64], quality: i32) -> Self {
        let quality = quality.clamp(MIN_SCALE, MAX_SCALE);

        let mut values = [0u8; 64];
        for (natural, &q) in standard.iter().enumerate() {
            let scaled = (q as i32 * quality + 50) / 100;
            values[NATURAL_TO_ZIGZAG[natural]] = scaled.clamp(1, 255) as u8;
        }

        QuantizationTable { id, values }
    }

    /// Luminance table (id 0) for the given scale.
    pub fn luminance(quality: i32) -> Self {
        Self::scaled(0, &STD_LUMINANCE_QUANT, quality)
    }

    /// Chrominance table (id 1) for the given scale.
    pub fn chrominance(quality: i32) -> Self {
        Self::scaled(1, &STD_CHROMINANCE_QUANT, quality)
    }

    /// Get value at natural (row-major) position.
    pub fn get_natural(&self, row: usize, col: usize) -> u8 {
        self.values[NATURAL_TO_ZIGZAG[row * 8 + col]]
    }
}
