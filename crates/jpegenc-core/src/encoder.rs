//! Encoding session: drives every block of an image through the pipeline.
//!
//! Blocks are visited in raster order. Color conversion and the DCT are pure
//! per block; the DC predictors and the bit writer carry state from one block
//! to the next and are owned by [`EncoderSession`].

use std::io::Write;

use crate::bit_writer::BitWriter;
use crate::color::{self, ChannelBlocks};
use crate::dct::{self, DctMethod};
use crate::entropy;
use crate::error::Result;
use crate::huffman::{HuffmanTables, VariableLengthCode};
use crate::image::Image;
use crate::quantization::{Quality, QuantizationTable};
use crate::writer::ContainerWriter;

/// Settings of one encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Quantization scale. Larger values quantize coarser; 50 halves the
    /// standard tables.
    pub quality: Quality,

    /// Forward DCT implementation.
    pub dct_method: DctMethod,

    /// Compute block coefficients on the rayon thread pool. Needs the
    /// `parallel` feature; without it the flag is ignored. Output is
    /// byte-identical either way.
    pub parallel: bool,
}

/// Encode `image` into a complete JFIF byte stream.
pub fn encode(image: &Image, options: &EncoderOptions) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(image.width() * image.height() / 2);
    encode_to(image, options, &mut out)?;
    Ok(out)
}

/// Encode `image` and write the JFIF stream to `sink`.
pub fn encode_to<W: Write>(image: &Image, options: &EncoderOptions, sink: W) -> Result<()> {
    EncoderSession::new(image, options)?.write_to(sink)
}

/// Per-block pure stages: color transform, DCT, quantization and zigzag.
#[derive(Clone, Copy)]
struct BlockPipeline<'a> {
    image: &'a Image,
    luma: &'a QuantizationTable,
    chroma: &'a QuantizationTable,
    method: DctMethod,
}

impl BlockPipeline<'_> {
    /// Quantized coefficients of the three channels of one block.
    fn block(&self, block_row: usize, block_col: usize) -> ChannelBlocks {
        let [y, cb, cr] = color::transform_block(self.image, block_row, block_col);
        [
            dct::transform(&y, self.luma, self.method),
            dct::transform(&cb, self.chroma, self.method),
            dct::transform(&cr, self.chroma, self.method),
        ]
    }

    fn row(&self, block_row: usize) -> Vec<ChannelBlocks> {
        (0..self.image.blocks_wide())
            .map(|block_col| self.block(block_row, block_col))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn rows_parallel(&self) -> Vec<Vec<ChannelBlocks>> {
        use rayon::prelude::*;

        (0..self.image.blocks_tall())
            .into_par_iter()
            .map(|block_row| self.row(block_row))
            .collect()
    }
}

/// State of one encode, from table construction to the final EOI.
///
/// Tables are built once in [`EncoderSession::new`] and read-only afterwards.
/// The three DC predictors start at zero and are never reset mid-image.
#[derive(Debug)]
pub struct EncoderSession<'a> {
    image: &'a Image,
    options: EncoderOptions,
    luma: QuantizationTable,
    chroma: QuantizationTable,
    huffman: HuffmanTables,
    predictors: [i32; 3],
    bits: BitWriter<Vec<u8>>,
    codes: Vec<VariableLengthCode>,
}

impl<'a> EncoderSession<'a> {
    pub fn new(image: &'a Image, options: &EncoderOptions) -> Result<Self> {
        #[cfg(not(feature = "parallel"))]
        if options.parallel {
            log::warn!("parallel encoding requested without the `parallel` feature, encoding sequentially");
        }

        let scale = options.quality.value();
        Ok(EncoderSession {
            image,
            options: *options,
            luma: QuantizationTable::luminance(scale),
            chroma: QuantizationTable::chrominance(scale),
            huffman: HuffmanTables::standard()?,
            predictors: [0; 3],
            bits: BitWriter::new(Vec::with_capacity(image.width() * image.height() / 2)),
            codes: Vec::with_capacity(128),
        })
    }

    pub fn luminance_table(&self) -> &QuantizationTable {
        &self.luma
    }

    pub fn chrominance_table(&self) -> &QuantizationTable {
        &self.chroma
    }

    pub fn huffman_tables(&self) -> &HuffmanTables {
        &self.huffman
    }

    /// Encode the whole image and write the container to `sink`.
    pub fn write_to<W: Write>(mut self, sink: W) -> Result<()> {
        let mut container = ContainerWriter::new(sink);
        container.write_headers(
            self.image.width() as u16,
            self.image.height() as u16,
            &self.luma,
            &self.chroma,
            &self.huffman,
        )?;

        self.encode_scan()?;
        self.bits.flush()?;
        let scan_len = self.bits.bytes_written();
        let scan = self.bits.into_inner();

        container.write_scan_data(&scan)?;
        container.write_eoi()?;
        container.into_inner().flush()?;

        log::debug!(
            "Encoder: {}x{}, quality={}, dct={:?}, blocks={}, scan_bytes={}",
            self.image.width(),
            self.image.height(),
            self.options.quality.value(),
            self.options.dct_method,
            self.image.blocks_wide() * self.image.blocks_tall(),
            scan_len
        );
        Ok(())
    }

    fn pipeline(&self) -> BlockPipeline<'_> {
        BlockPipeline {
            image: self.image,
            luma: &self.luma,
            chroma: &self.chroma,
            method: self.options.dct_method,
        }
    }

    fn encode_scan(&mut self) -> Result<()> {
        #[cfg(feature = "parallel")]
        if self.options.parallel {
            let rows = self.pipeline().rows_parallel();
            for (block_row, row) in rows.iter().enumerate() {
                self.encode_row(block_row, row)?;
            }
            return Ok(());
        }

        for block_row in 0..self.image.blocks_tall() {
            let row = self.pipeline().row(block_row);
            self.encode_row(block_row, &row)?;
        }
        Ok(())
    }

    /// Entropy-code one row of blocks in Y, Cb, Cr order per block.
    fn encode_row(&mut self, block_row: usize, row: &[ChannelBlocks]) -> Result<()> {
        for (block_col, [y, cb, cr]) in row.iter().enumerate() {
            self.codes.clear();
            let tables = &self.huffman;
            entropy::encode_block(
                y,
                &tables.luma_dc,
                &tables.luma_ac,
                &mut self.predictors[0],
                &mut self.codes,
            );
            entropy::encode_block(
                cb,
                &tables.chroma_dc,
                &tables.chroma_ac,
                &mut self.predictors[1],
                &mut self.codes,
            );
            entropy::encode_block(
                cr,
                &tables.chroma_dc,
                &tables.chroma_ac,
                &mut self.predictors[2],
                &mut self.codes,
            );
            self.bits.write_codes(&self.codes)?;

            log::trace!(
                "Block ({}, {}): {} codes, {} bytes so far",
                block_row,
                block_col,
                self.codes.len(),
                self.bits.bytes_written()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::EOB;
    use crate::image::PixelOrder;

    fn gradient(width: usize, height: usize) -> Image {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let (x, y) = (i % width, i / width);
                [(x * 255 / width) as u8, (y * 255 / height) as u8, 96]
            })
            .collect();
        Image::new(width, height, pixels, PixelOrder::Rgb).unwrap()
    }

    /// Entropy-coded bytes between the SOS header and EOI.
    fn scan_data(jpeg: &[u8]) -> &[u8] {
        let sos = jpeg
            .windows(2)
            .position(|w| w == [0xFF, 0xDA])
            .unwrap();
        let start = sos + 2 + 12;
        &jpeg[start..jpeg.len() - 2]
    }

    #[test]
    fn stream_is_framed_by_soi_and_eoi() {
        let jpeg = encode(&gradient(32, 16), &EncoderOptions::default()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn mid_gray_block_is_dc_code_and_eob_only() {
        let image = Image::new(8, 8, vec![128; 8 * 8 * 3], PixelOrder::Rgb).unwrap();
        let options = EncoderOptions {
            quality: Quality::new(75).unwrap(),
            ..Default::default()
        };
        let jpeg = encode(&image, &options).unwrap();

        let tables = HuffmanTables::standard().unwrap();
        let mut expected = BitWriter::new(Vec::new());
        for (dc, ac) in [
            (&tables.luma_dc, &tables.luma_ac),
            (&tables.chroma_dc, &tables.chroma_ac),
            (&tables.chroma_dc, &tables.chroma_ac),
        ] {
            expected.write_code(dc.code(0)).unwrap();
            expected.write_code(ac.code(EOB)).unwrap();
        }
        expected.flush().unwrap();

        // 110 1010 | 00 00 | 00 00
        assert_eq!(scan_data(&jpeg), &expected.into_inner()[..]);
        assert_eq!(scan_data(&jpeg), &[0b1101_0100, 0b0000_0000]);
    }

    #[test]
    fn encoding_is_idempotent() {
        let image = gradient(64, 24);
        let options = EncoderOptions::default();
        assert_eq!(
            encode(&image, &options).unwrap(),
            encode(&image, &options).unwrap()
        );
    }

    #[test]
    fn encode_to_matches_encode() {
        let image = gradient(16, 16);
        let options = EncoderOptions {
            dct_method: DctMethod::Integer,
            ..Default::default()
        };
        let mut sink = Vec::new();
        encode_to(&image, &options, &mut sink).unwrap();
        assert_eq!(sink, encode(&image, &options).unwrap());
    }

    #[test]
    fn session_tables_follow_quality() {
        let image = gradient(8, 8);
        let options = EncoderOptions {
            quality: Quality::new(100).unwrap(),
            ..Default::default()
        };
        let session = EncoderSession::new(&image, &options).unwrap();
        assert_eq!(*session.luminance_table(), QuantizationTable::luminance(99));
        assert_eq!(*session.chrominance_table(), QuantizationTable::chrominance(99));
        assert_eq!(session.huffman_tables().luma_dc.code(0).length, 3);
    }

    #[test]
    fn coarser_scale_gives_smaller_output() {
        let image = gradient(64, 64);
        let fine = EncoderOptions {
            quality: Quality::new(10).unwrap(),
            ..Default::default()
        };
        let coarse = EncoderOptions {
            quality: Quality::new(90).unwrap(),
            ..Default::default()
        };
        assert!(encode(&image, &coarse).unwrap().len() < encode(&image, &fine).unwrap().len());
    }

    #[test]
    fn write_errors_are_resource_errors() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = encode_to(&gradient(8, 8), &EncoderOptions::default(), Broken).unwrap_err();
        assert!(err.is_resource_error());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_output_is_byte_identical() {
        let image = gradient(128, 72);
        for dct_method in [DctMethod::Float, DctMethod::Integer] {
            let sequential = EncoderOptions {
                dct_method,
                ..Default::default()
            };
            let parallel = EncoderOptions {
                parallel: true,
                ..sequential
            };
            assert_eq!(
                encode(&image, &sequential).unwrap(),
                encode(&image, &parallel).unwrap()
            );
        }
    }
}
