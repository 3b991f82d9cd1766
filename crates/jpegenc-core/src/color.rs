//! RGB to level-shifted YCbCr conversion.
//!
//! The encoder uses 16.16 fixed-point weights. [`rgb_to_ycbcr_reference`] is
//! the floating-point definition the fixed-point path is tested against.

use crate::image::Image;

/// One 8x8 block per channel (Y, Cb, Cr), natural order.
pub type ChannelBlocks = [[i16; 64]; 3];

const FIX_SHIFT: i32 = 16;
const ROUND: i32 = 1 << (FIX_SHIFT - 1);

// Weights scaled by 2^16. Each chroma row sums to zero.
const Y_R: i32 = 19595;
const Y_G: i32 = 38470;
const Y_B: i32 = 7471;
const CB_R: i32 = -11058;
const CB_G: i32 = -21710;
const CB_B: i32 = 32768;
const CR_R: i32 = 32768;
const CR_G: i32 = -27439;
const CR_B: i32 = -5329;

/// Convert one pixel to `(Y - 128, Cb, Cr)`.
///
/// Y lies in -128..=127, Cb and Cr in -128..=128.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (i16, i16, i16) {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    let y = ((Y_R * r + Y_G * g + Y_B * b + ROUND) >> FIX_SHIFT) - 128;
    let cb = (CB_R * r + CB_G * g + CB_B * b + ROUND) >> FIX_SHIFT;
    let cr = (CR_R * r + CR_G * g + CR_B * b + ROUND) >> FIX_SHIFT;

    (y as i16, cb as i16, cr as i16)
}

/// Floating-point definition of [`rgb_to_ycbcr`].
pub fn rgb_to_ycbcr_reference(r: u8, g: u8, b: u8) -> (i16, i16, i16) {
    let (r, g, b) = (r as f64, g as f64, b as f64);

    let y = (0.299 * r + 0.587 * g + 0.114 * b).round() - 128.0;
    let cb = (-0.168736 * r - 0.331264 * g + 0.5 * b).round();
    let cr = (0.5 * r - 0.418688 * g - 0.081312 * b).round();

    (y as i16, cb as i16, cr as i16)
}

/// Convert the 8x8 block at `(block_row, block_col)` into three channel blocks.
pub fn transform_block(image: &Image, block_row: usize, block_col: usize) -> ChannelBlocks {
    let order = image.order();
    let mut blocks = [[0i16; 64]; 3];

    for row in 0..8 {
        let pixels = image.block_row(block_row, block_col, row);
        for (col, pixel) in pixels.chunks_exact(3).enumerate() {
            let (r, g, b) = order.rgb(pixel);
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let i = row * 8 + col;
            blocks[0][i] = y;
            blocks[1][i] = cb;
            blocks[2][i] = cr;
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelOrder;

    fn assert_close(r: u8, g: u8, b: u8) {
        let fixed = rgb_to_ycbcr(r, g, b);
        let float = rgb_to_ycbcr_reference(r, g, b);
        let within = |a: i16, b: i16| (a - b).abs() <= 1;
        assert!(
            within(fixed.0, float.0) && within(fixed.1, float.1) && within(fixed.2, float.2),
            "rgb({r}, {g}, {b}): fixed {fixed:?} vs float {float:?}"
        );
    }

    #[test]
    fn fixed_point_tracks_the_float_definition() {
        let mut samples: Vec<u8> = (0..=255).step_by(3).collect();
        samples.extend([1, 254, 255]);

        for &r in &samples {
            for &g in &samples {
                for &b in &samples {
                    assert_close(r, g, b);
                }
            }
        }
    }

    #[test]
    fn primaries_and_extremes() {
        assert_eq!(rgb_to_ycbcr(0, 0, 0), (-128, 0, 0));
        assert_eq!(rgb_to_ycbcr(255, 255, 255), (127, 0, 0));
        assert_eq!(rgb_to_ycbcr(128, 128, 128), (0, 0, 0));

        // pure blue and pure red reach +128 on their chroma axis
        assert_eq!(rgb_to_ycbcr(0, 0, 255).1, 128);
        assert_eq!(rgb_to_ycbcr(255, 0, 0).2, 128);
        assert!(rgb_to_ycbcr(255, 255, 0).1 <= -127);
    }

    #[test]
    fn block_respects_pixel_order() {
        // left half blue, right half red, stored as BGR
        let pixels: Vec<u8> = (0..64)
            .flat_map(|i| if i % 8 < 4 { [255, 0, 0] } else { [0, 0, 255] })
            .collect();
        let image = Image::new(8, 8, pixels, PixelOrder::Bgr).unwrap();

        let [y, cb, cr] = transform_block(&image, 0, 0);
        assert_eq!(cb[0], 128);
        assert!(cr[0] < 0);
        assert_eq!(cr[7], 128);
        assert!(cb[7] < 0);
        assert!(y[0] < y[7], "red is brighter than blue");
    }
}
