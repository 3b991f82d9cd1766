//! # jpegenc core
//!
//! A baseline JPEG encoder. An [`Image`] of 24-bit pixels with dimensions
//! that are multiples of 8 is turned into a single-scan, 4:4:4 JFIF stream:
//!
//! - [`color`] converts each 8x8 block to level-shifted YCbCr,
//! - [`dct`] applies the forward DCT, quantizes and zigzag-orders it,
//! - [`entropy`] turns coefficients into Huffman codes,
//! - [`bit_writer`] packs the codes with 0xFF byte stuffing,
//! - [`writer`] wraps the scan in the SOI .. EOI marker segments.
//!
//! # Usage Examples
//!
//! ## Encode a pixel buffer
//!
//! ```rust
//! use jpegenc_core::{encode, EncoderOptions, Image, PixelOrder, Quality};
//!
//! let pixels = vec![128u8; 16 * 16 * 3];
//! let image = Image::new(16, 16, pixels, PixelOrder::Rgb).expect("valid image");
//!
//! let options = EncoderOptions {
//!     quality: Quality::new(75).expect("valid quality"),
//!     ..Default::default()
//! };
//! let jpeg = encode(&image, &options).expect("Failed to encode");
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! ```
//!
//! ## Encode a file
//!
//! ```rust
//! use tempfile::tempdir;
//!
//! let temp_dir = tempdir().expect("Failed to create temporary directory");
//! let image = jpegenc_core::Image::new(8, 8, vec![200; 8 * 8 * 3], Default::default())
//!     .expect("valid image");
//!
//! jpegenc_core::api::encode::prepare()
//!     .with_pixels(image)
//!     .with_quality(50)
//!     .with_output(temp_dir.path().join("out.jpg"))
//!     .execute()
//!     .expect("Failed to encode image");
//! ```

#![warn(
    // clippy::unwrap_used,
    // clippy::expect_used,
    clippy::redundant_else,
)]

pub mod api;
pub mod bit_writer;
pub mod color;
pub mod dct;
pub mod encoder;
pub mod entropy;
pub mod error;
pub mod huffman;
pub mod image;
pub mod marker;
pub mod quantization;
pub mod tables;
pub mod writer;

pub use crate::dct::DctMethod;
pub use crate::encoder::{encode, encode_to, EncoderOptions, EncoderSession};
pub use crate::error::{JpegEncodeError, Result};
pub use crate::image::{Image, PixelOrder};
pub use crate::quantization::Quality;
