//! Forward DCT, quantization and zigzag reordering of 8x8 blocks.
//!
//! The floating-point transform is the reference. The integer transform
//! computes the same separable DCT on a 2^14 cosine table and is kept within
//! one quantization step of the reference.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

use crate::quantization::QuantizationTable;
use crate::tables::ZIGZAG_TO_NATURAL;

/// Largest quantized DC magnitude; keeps DC differences within size class 11.
pub const DC_RANGE: (i16, i16) = (-1024, 1023);
/// Largest quantized AC magnitude; keeps AC values within size class 10.
pub const AC_RANGE: (i16, i16) = (-1023, 1023);

/// Which forward DCT implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DctMethod {
    /// Double precision with a precomputed cosine table.
    #[default]
    Float,
    /// Fixed-point, two 1-D passes on a 2^14 cosine table.
    Integer,
}

/// Transform one channel block (natural order, level-shifted samples) into
/// 64 quantized coefficients in zigzag order.
pub fn transform(block: &[i16; 64], table: &QuantizationTable, method: DctMethod) -> [i16; 64] {
    let mut coefficients = [0i16; 64];

    match method {
        DctMethod::Float => {
            let dct = forward_dct_float(block);
            for (zz, coefficient) in coefficients.iter_mut().enumerate() {
                let q = table.values[zz] as f64;
                *coefficient = (dct[ZIGZAG_TO_NATURAL[zz]] / q).round() as i16;
            }
        }
        DctMethod::Integer => {
            let dct = forward_dct_integer(block);
            for (zz, coefficient) in coefficients.iter_mut().enumerate() {
                let q = (table.values[zz] as i64) << INT_VALUE_BITS;
                *coefficient = div_round(dct[ZIGZAG_TO_NATURAL[zz]], q) as i16;
            }
        }
    }

    clamp_coefficients(&mut coefficients);
    coefficients
}

fn clamp_coefficients(coefficients: &mut [i16; 64]) {
    coefficients[0] = coefficients[0].clamp(DC_RANGE.0, DC_RANGE.1);
    for ac in &mut coefficients[1..] {
        *ac = (*ac).clamp(AC_RANGE.0, AC_RANGE.1);
    }
}

/// `cos((2x + 1) * u * PI / 16)`, indexed `[x][u]`.
fn cosine_table() -> &'static [[f64; 8]; 8] {
    static TABLE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [[0.0; 8]; 8];
        for (x, row) in table.iter_mut().enumerate() {
            for (u, c) in row.iter_mut().enumerate() {
                *c = ((2 * x + 1) as f64 * u as f64 * PI / 16.0).cos();
            }
        }
        table
    })
}

#[inline]
fn alpha(k: usize) -> f64 {
    if k == 0 {
        // 1 / sqrt(8)
        FRAC_1_SQRT_2 / 2.0
    } else {
        0.5
    }
}

/// Unquantized DCT coefficients in natural order, `[u * 8 + v]` with `u` the
/// vertical and `v` the horizontal frequency.
pub fn forward_dct_float(block: &[i16; 64]) -> [f64; 64] {
    let cos = cosine_table();

    // rows: tmp[y][v] = sum_x f(y, x) * cos_x_v
    let mut tmp = [0.0f64; 64];
    for y in 0..8 {
        for v in 0..8 {
            tmp[y * 8 + v] = (0..8)
                .map(|x| block[y * 8 + x] as f64 * cos[x][v])
                .sum();
        }
    }

    let mut out = [0.0f64; 64];
    for u in 0..8 {
        for v in 0..8 {
            let sum: f64 = (0..8).map(|y| tmp[y * 8 + v] * cos[y][u]).sum();
            out[u * 8 + v] = alpha(u) * alpha(v) * sum;
        }
    }
    out
}

const COS_BITS: u32 = 14;
/// Fractional bits kept between the two passes.
const PASS1_BITS: u32 = 3;
/// `alpha(0)` and `alpha(k > 0)` scaled by 2^14.
const ALPHA_INT: [i64; 2] = [5793, 8192];
/// Fractional bits of the integer transform's output.
const INT_VALUE_BITS: u32 = PASS1_BITS + 2 * COS_BITS;

fn integer_cosine_table() -> &'static [[i32; 8]; 8] {
    static TABLE: OnceLock<[[i32; 8]; 8]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let scale = (1 << COS_BITS) as f64;
        let mut table = [[0i32; 8]; 8];
        for (x, row) in cosine_table().iter().enumerate() {
            for (u, &c) in row.iter().enumerate() {
                table[x][u] = (c * scale).round() as i32;
            }
        }
        table
    })
}

/// Arithmetic right shift rounding to nearest.
#[inline]
fn round_shift(value: i64, bits: u32) -> i64 {
    (value + (1 << (bits - 1))) >> bits
}

/// Integer division rounding half away from zero.
#[inline]
fn div_round(n: i64, d: i64) -> i64 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        -((-n + d / 2) / d)
    }
}

/// Unquantized DCT coefficients in natural order, scaled by 2^31.
pub fn forward_dct_integer(block: &[i16; 64]) -> [i64; 64] {
    let cos = integer_cosine_table();

    let mut tmp = [0i64; 64];
    for y in 0..8 {
        for v in 0..8 {
            let sum: i64 = (0..8)
                .map(|x| block[y * 8 + x] as i64 * cos[x][v] as i64)
                .sum();
            tmp[y * 8 + v] = round_shift(sum, COS_BITS - PASS1_BITS);
        }
    }

    let mut out = [0i64; 64];
    for u in 0..8 {
        for v in 0..8 {
            let sum: i64 = (0..8).map(|y| tmp[y * 8 + v] * cos[y][u] as i64).sum();
            let pass2 = round_shift(sum, COS_BITS);
            let a = ALPHA_INT[(u > 0) as usize] * ALPHA_INT[(v > 0) as usize];
            out[u * 8 + v] = pass2 * a;
        }
    }
    out
}
