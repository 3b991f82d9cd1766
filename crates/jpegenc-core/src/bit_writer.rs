//! MSB-first bit packing with JPEG byte stuffing.
//!
//! Adapted from [jpeg-encoder](https://github.com/vstroebel/jpeg-encoder).

use std::io::Write;

use crate::error::Result;
use crate::huffman::VariableLengthCode;

/// Packs variable-length codes into bytes.
///
/// A single partial byte is held with a cursor naming the next bit to fill,
/// 7 (MSB) down to 0. Every completed byte is written to the sink, and a
/// completed `0xFF` is followed by a stuffed `0x00`.
#[derive(Debug)]
pub struct BitWriter<W> {
    inner: W,
    byte: u8,
    cursor: i8,
    bytes_written: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            byte: 0,
            cursor: 7,
            bytes_written: 0,
        }
    }

    /// Write the low `code.length` bits of `code.value`, MSB first.
    #[inline]
    pub fn write_code(&mut self, code: VariableLengthCode) -> Result<()> {
        let mut remaining = code.length as i8;
        let value = code.value as u32;

        while remaining > 0 {
            let free = self.cursor + 1;
            let take = remaining.min(free);
            let chunk = (value >> (remaining - take)) & ((1u32 << take) - 1);

            self.byte |= (chunk << (free - take)) as u8;
            self.cursor -= take;
            remaining -= take;

            if self.cursor < 0 {
                self.emit()?;
            }
        }

        Ok(())
    }

    /// Write a sequence of codes in order.
    pub fn write_codes(&mut self, codes: &[VariableLengthCode]) -> Result<()> {
        for &code in codes {
            self.write_code(code)?;
        }
        Ok(())
    }

    /// Emit the partial byte, if any. Unwritten low bits are zero.
    pub fn flush(&mut self) -> Result<()> {
        if self.cursor != 7 {
            self.emit()?;
        }
        Ok(())
    }

    /// Bytes written to the sink so far, stuffing included.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Return the sink. Call [`BitWriter::flush`] first to keep a partial byte.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn emit(&mut self) -> Result<()> {
        let byte = self.byte;
        self.inner.write_all(&[byte])?;
        self.bytes_written += 1;
        if byte == 0xFF {
            // Byte stuffing: 0xFF -> 0xFF 0x00
            self.inner.write_all(&[0x00])?;
            self.bytes_written += 1;
        }
        self.byte = 0;
        self.cursor = 7;
        Ok(())
    }
}
