//! Huffman entropy coding of quantized blocks.

use crate::huffman::{HuffmanTable, VariableLengthCode};

/// AC symbol for a run of 16 zeros.
pub const ZRL: u8 = 0xF0;
/// AC symbol ending a block early.
pub const EOB: u8 = 0x00;

/// Encode one channel block of zigzag-ordered coefficients.
///
/// The DC coefficient is coded as the difference to `dc_predictor`, which is
/// updated to this block's DC value. AC coefficients are run-length coded up
/// to the last nonzero entry, followed by EOB unless that entry is the 63rd.
/// Codes are appended to `sink` in emission order.
pub fn encode_block(
    coefficients: &[i16; 64],
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
    sink: &mut Vec<VariableLengthCode>,
) {
    let dc_value = coefficients[0] as i32;
    let dc_diff = dc_value - *dc_predictor;
    *dc_predictor = dc_value;

    let magnitude = VariableLengthCode::magnitude(dc_diff);
    sink.push(dc_table.code(magnitude.length));
    if !magnitude.is_empty() {
        sink.push(magnitude);
    }
    log::trace!(
        "DC: value={}, diff={}, size={}, bits={:0width$b}",
        dc_value,
        dc_diff,
        magnitude.length,
        magnitude.value,
        width = magnitude.length as usize
    );

    let end = coefficients[1..]
        .iter()
        .rposition(|&c| c != 0)
        .map_or(0, |i| i + 1);

    let mut zero_run = 0u8;
    for (k, &coefficient) in coefficients.iter().enumerate().take(end + 1).skip(1) {
        if coefficient == 0 {
            zero_run += 1;
            continue;
        }

        while zero_run >= 16 {
            sink.push(ac_code(ac_table, ZRL));
            log::trace!("ZRL at k={}", k);
            zero_run -= 16;
        }

        let magnitude = VariableLengthCode::magnitude(coefficient as i32);
        let symbol = (zero_run << 4) | magnitude.length;
        sink.push(ac_code(ac_table, symbol));
        sink.push(magnitude);
        log::trace!(
            "AC[{}]: coeff={}, run={}, size={}, symbol={:02X}",
            k,
            coefficient,
            zero_run,
            magnitude.length,
            symbol
        );

        zero_run = 0;
    }

    if end < 63 {
        sink.push(ac_code(ac_table, EOB));
        log::trace!("EOB after k={}", end);
    }
}

/// Every AC symbol reachable here has a code in the standard tables because
/// `dct::AC_RANGE` caps magnitudes at size 10; `dct::DC_RANGE` does the same
/// for DC differences (size 11).
#[inline]
fn ac_code(table: &HuffmanTable, symbol: u8) -> VariableLengthCode {
    let code = table.code(symbol);
    debug_assert!(!code.is_empty(), "AC symbol {symbol:02X} has no code");
    code
}
