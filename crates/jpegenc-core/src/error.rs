//! Error types for JPEG encoding.

use std::fmt;
use thiserror::Error;

/// Result type alias for encoder operations.
pub type Result<T> = std::result::Result<T, JpegEncodeError>;

/// Errors that can occur while preparing or running an encode.
///
/// Every error is raised before the first block is encoded or while writing
/// to the output sink; the pipeline itself is total over validated input.
#[derive(Error)]
pub enum JpegEncodeError {
    /// Width or height is zero, not a multiple of 8, or does not fit the 16-bit SOF0 field.
    #[error("invalid dimensions {width}x{height}: both must be positive multiples of 8 and at most 65535")]
    InvalidDimensions { width: usize, height: usize },

    /// Pixel buffer length doesn't match `width * height * 3`.
    #[error("invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The input file decoded to something other than 8-bit RGB.
    #[error("unsupported color type {color}: only 24-bit RGB input is accepted")]
    UnsupportedColorType { color: String },

    /// No input image was provided to the encode API.
    #[error("no input image set")]
    MissingImage,

    /// No output target was provided to the encode API.
    #[error("no output file set")]
    MissingOutput,

    /// Quality outside the accepted 1-100 range.
    #[error("invalid quality {0}: must be between 1 and 100")]
    InvalidQuality(i32),

    /// A Huffman table specification that cannot produce a canonical code.
    #[error("invalid Huffman table specification: {reason}")]
    InvalidHuffmanSpec { reason: String },

    /// The input file could not be decoded into a raster image.
    #[cfg(feature = "image-input")]
    #[error("input image could not be decoded")]
    UnsupportedInput(#[from] image::ImageError),

    /// Represents a failure to read the input.
    #[error("read error")]
    Read { source: std::io::Error },

    /// Represents a failure to write the output.
    #[error("write error")]
    Write { source: std::io::Error },
}

impl JpegEncodeError {
    /// Input validation failures: missing, zero-sized or misaligned images.
    pub fn is_input_error(&self) -> bool {
        match self {
            JpegEncodeError::InvalidDimensions { .. }
            | JpegEncodeError::InvalidPixelData { .. }
            | JpegEncodeError::UnsupportedColorType { .. }
            | JpegEncodeError::MissingImage => true,
            #[cfg(feature = "image-input")]
            JpegEncodeError::UnsupportedInput(_) => true,
            _ => false,
        }
    }

    /// Output sink (or input file) could not be opened, read or written.
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            JpegEncodeError::Read { .. }
                | JpegEncodeError::Write { .. }
                | JpegEncodeError::MissingOutput
        )
    }

    /// Rejected configuration values.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            JpegEncodeError::InvalidQuality(_) | JpegEncodeError::InvalidHuffmanSpec { .. }
        )
    }
}

impl From<std::io::Error> for JpegEncodeError {
    fn from(source: std::io::Error) -> Self {
        JpegEncodeError::Write { source }
    }
}

impl fmt::Debug for JpegEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")?;
        if let Some(source) = std::error::Error::source(self) {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_is_disjoint() {
        let errors = [
            JpegEncodeError::InvalidDimensions {
                width: 0,
                height: 8,
            },
            JpegEncodeError::InvalidQuality(101),
            JpegEncodeError::Write {
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            },
        ];

        for e in &errors {
            let hits = [
                e.is_input_error(),
                e.is_resource_error(),
                e.is_configuration_error(),
            ]
            .iter()
            .filter(|&&b| b)
            .count();
            assert_eq!(hits, 1, "{e} should belong to exactly one class");
        }
    }

    #[test]
    fn io_errors_become_write_errors() {
        let e: JpegEncodeError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(e.is_resource_error());
        assert_eq!(format!("{e:?}"), "write error: boom");
    }
}
