//! Huffman coding tables for JPEG entropy coding.
//!
//! Tables are built from the same (code-length counts, symbol order) pair that
//! is written into the DHT segment, so the decoder reconstructs exactly the
//! codes the encoder uses.
//!
//! Adapted from [jpeg-encoder](https://github.com/vstroebel/jpeg-encoder).

use crate::error::{JpegEncodeError, Result};

/// A right-justified bit pattern of `length` bits, written MSB-first.
///
/// Used both for Huffman codewords and for the magnitude bits that follow
/// them. A zero-length code writes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariableLengthCode {
    /// Number of bits (0-16).
    pub length: u8,
    /// Bit pattern in the low `length` bits.
    pub value: u16,
}

impl VariableLengthCode {
    pub const EMPTY: VariableLengthCode = VariableLengthCode {
        length: 0,
        value: 0,
    };

    pub fn new(length: u8, value: u16) -> Self {
        debug_assert!(length <= 16);
        VariableLengthCode { length, value }
    }

    /// JPEG signed-magnitude code for a coefficient or DC difference.
    ///
    /// The length is the bit size (category) of `|value|`. Positive values are
    /// written as-is, negative values as `value + 2^size - 1`, the complement
    /// representation of ITU T.81 F.1.2.1.
    #[inline]
    pub fn magnitude(value: i32) -> Self {
        if value == 0 {
            return Self::EMPTY;
        }

        let abs_value = value.unsigned_abs();
        let size = (32 - abs_value.leading_zeros()) as u8;

        let bits = if value < 0 {
            (1i32 << size) + value - 1
        } else {
            value
        };

        VariableLengthCode::new(size, bits as u16)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Huffman table specification as carried in a DHT segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanSpec<'a> {
    /// Number of codes of each length 1..=16.
    pub code_lengths: [u8; 16],
    /// Symbols in the order codes are assigned.
    pub values: &'a [u8],
}

/// Class of a Huffman table, written in the high nibble of the DHT `Tc/Th` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// Compiled Huffman table for fast encoding.
///
/// Maps symbols to their codeword for O(1) encoding lookup. Symbols that are
/// not part of the specification keep an empty code.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    pub class: TableClass,
    /// Table ID (0 = luminance, 1 = chrominance).
    pub id: u8,
    /// Code length counts, kept for the DHT segment.
    pub code_lengths: [u8; 16],
    /// Symbol order, kept for the DHT segment.
    pub values: Vec<u8>,
    /// symbol → codeword
    codes: [VariableLengthCode; 256],
}

impl HuffmanTable {
    /// Build the canonical codes for a table specification.
    ///
    /// Codes are assigned in symbol order: starting from 0, each length class
    /// takes the next `code_lengths[k]` consecutive values, then the running
    /// code is shifted left by one before moving to the next length.
    pub fn from_spec(class: TableClass, id: u8, spec: &HuffmanSpec<'_>) -> Result<Self> {
        let total: usize = spec.code_lengths.iter().map(|&n| n as usize).sum();
        if total > 256 {
            return Err(JpegEncodeError::InvalidHuffmanSpec {
                reason: "Huffman table has more than 256 symbols".to_string(),
            });
        }
        if total != spec.values.len() {
            return Err(JpegEncodeError::InvalidHuffmanSpec {
                reason: format!(
                    "code lengths describe {} symbols but {} values were given",
                    total,
                    spec.values.len()
                ),
            });
        }

        let mut codes = [VariableLengthCode::EMPTY; 256];
        let mut symbols = spec.values.iter();
        let mut code: u32 = 0;

        for (len_index, &count) in spec.code_lengths.iter().enumerate() {
            let length = (len_index + 1) as u8;
            for _ in 0..count {
                if code >= (1u32 << length) {
                    return Err(JpegEncodeError::InvalidHuffmanSpec {
                        reason: format!("code overflow at length {length}"),
                    });
                }
                // lengths sum to values.len(), checked above
                if let Some(&symbol) = symbols.next() {
                    codes[symbol as usize] = VariableLengthCode::new(length, code as u16);
                }
                code += 1;
            }
            code <<= 1;
        }

        // the last assigned code must not be all ones at its length
        if let Some(last_length) = spec.code_lengths.iter().rposition(|&n| n > 0) {
            let shift = spec.code_lengths.len() - last_length;
            let last_code = (code >> shift) - 1;
            let length = last_length as u32 + 1;
            if last_code == (1u32 << length) - 1 {
                return Err(JpegEncodeError::InvalidHuffmanSpec {
                    reason: format!("all-ones code at length {length}"),
                });
            }
        }

        Ok(HuffmanTable {
            class,
            id,
            code_lengths: spec.code_lengths,
            values: spec.values.to_vec(),
            codes,
        })
    }

    /// Get the codeword for a symbol. Empty if the symbol is not in the table.
    #[inline]
    pub fn code(&self, symbol: u8) -> VariableLengthCode {
        self.codes[symbol as usize]
    }

    /// `Tc << 4 | Th` byte identifying this table in DHT and SOS.
    pub fn class_and_id(&self) -> u8 {
        ((self.class as u8) << 4) | self.id
    }
}

/// The four tables of a baseline YCbCr encode.
#[derive(Debug, Clone)]
pub struct HuffmanTables {
    pub luma_dc: HuffmanTable,
    pub luma_ac: HuffmanTable,
    pub chroma_dc: HuffmanTable,
    pub chroma_ac: HuffmanTable,
}

impl HuffmanTables {
    /// Build the four standard tables.
    pub fn standard() -> Result<Self> {
        use crate::tables::{AC_CHROMINANCE, AC_LUMINANCE, DC_CHROMINANCE, DC_LUMINANCE};

        Ok(HuffmanTables {
            luma_dc: HuffmanTable::from_spec(TableClass::Dc, 0, &DC_LUMINANCE)?,
            luma_ac: HuffmanTable::from_spec(TableClass::Ac, 0, &AC_LUMINANCE)?,
            chroma_dc: HuffmanTable::from_spec(TableClass::Dc, 1, &DC_CHROMINANCE)?,
            chroma_ac: HuffmanTable::from_spec(TableClass::Ac, 1, &AC_CHROMINANCE)?,
        })
    }

    /// Tables in DHT emission order.
    pub fn in_dht_order(&self) -> [&HuffmanTable; 4] {
        [&self.luma_dc, &self.luma_ac, &self.chroma_dc, &self.chroma_ac]
    }
}
