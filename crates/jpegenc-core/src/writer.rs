//! JFIF container writer.
//!
//! Emits the fixed baseline marker sequence around the entropy-coded scan:
//! SOI, APP0, DQT, SOF0, DHT, SOS, scan data, EOI.
//!
//! Adapted from [jpeg-encoder](https://github.com/vstroebel/jpeg-encoder).

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::Result;
use crate::huffman::HuffmanTables;
use crate::marker::Marker;
use crate::quantization::QuantizationTable;

/// Component ids and their (DC/AC table, quantization table) selectors.
const COMPONENTS: [(u8, u8); 3] = [(1, 0), (2, 1), (3, 1)];
/// 4:4:4, one block per component per MCU.
const SAMPLING: u8 = 0x11;

/// Writes marker segments to a byte sink. All multi-byte fields are big-endian.
#[derive(Debug)]
pub struct ContainerWriter<W> {
    inner: W,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(inner: W) -> Self {
        ContainerWriter { inner }
    }

    /// Write everything that precedes the scan data, SOI through SOS.
    pub fn write_headers(
        &mut self,
        width: u16,
        height: u16,
        luma: &QuantizationTable,
        chroma: &QuantizationTable,
        huffman: &HuffmanTables,
    ) -> Result<()> {
        self.write_marker(Marker::SOI)?;
        self.write_app0()?;
        self.write_dqt(&[luma, chroma])?;
        self.write_sof0(width, height)?;
        self.write_dht(huffman)?;
        self.write_sos()
    }

    pub fn write_marker(&mut self, marker: Marker) -> Result<()> {
        self.inner.write_u8(0xFF)?;
        self.inner.write_u8(marker.to_u8())?;
        Ok(())
    }

    /// Write a marker, its length field (payload + 2) and the payload.
    pub fn write_segment(&mut self, marker: Marker, payload: &[u8]) -> Result<()> {
        debug_assert!(marker.has_length());
        self.write_marker(marker)?;
        self.inner.write_u16::<BigEndian>((payload.len() + 2) as u16)?;
        self.inner.write_all(payload)?;
        Ok(())
    }

    /// JFIF 1.1 header without thumbnail.
    pub fn write_app0(&mut self) -> Result<()> {
        let mut payload = Vec::with_capacity(14);
        payload.extend_from_slice(b"JFIF\0");
        payload.write_u8(1)?; // major version
        payload.write_u8(1)?; // minor version
        payload.write_u8(0)?; // density units: aspect ratio only
        payload.write_u16::<BigEndian>(1)?; // X density
        payload.write_u16::<BigEndian>(1)?; // Y density
        payload.write_u8(0)?; // thumbnail width
        payload.write_u8(0)?; // thumbnail height
        self.write_segment(Marker::APP(0), &payload)
    }

    /// One DQT segment carrying all given 8-bit tables, values in zigzag order.
    pub fn write_dqt(&mut self, tables: &[&QuantizationTable]) -> Result<()> {
        let mut payload = Vec::with_capacity(tables.len() * 65);
        for table in tables {
            // Pq = 0 (8-bit precision), Tq = table id
            payload.write_u8(table.id)?;
            payload.extend_from_slice(&table.values);
        }
        self.write_segment(Marker::DQT, &payload)
    }

    /// Baseline frame header, 8-bit precision, three components, 4:4:4.
    pub fn write_sof0(&mut self, width: u16, height: u16) -> Result<()> {
        let mut payload = Vec::with_capacity(15);
        payload.write_u8(8)?;
        payload.write_u16::<BigEndian>(height)?;
        payload.write_u16::<BigEndian>(width)?;
        payload.write_u8(COMPONENTS.len() as u8)?;
        for (id, quant_table) in COMPONENTS {
            payload.write_u8(id)?;
            payload.write_u8(SAMPLING)?;
            payload.write_u8(quant_table)?;
        }
        self.write_segment(Marker::SOF(0), &payload)
    }

    /// One DHT segment with the four tables in `Tc/Th` order 0x00, 0x10, 0x01, 0x11.
    pub fn write_dht(&mut self, tables: &HuffmanTables) -> Result<()> {
        let mut payload = Vec::new();
        for table in tables.in_dht_order() {
            payload.write_u8(table.class_and_id())?;
            payload.extend_from_slice(&table.code_lengths);
            payload.extend_from_slice(&table.values);
        }
        self.write_segment(Marker::DHT, &payload)
    }

    /// Scan header covering all three components and the full spectrum.
    pub fn write_sos(&mut self) -> Result<()> {
        let mut payload = Vec::with_capacity(10);
        payload.write_u8(COMPONENTS.len() as u8)?;
        for (id, table) in COMPONENTS {
            payload.write_u8(id)?;
            // DC table (high nibble) and AC table (low nibble)
            payload.write_u8((table << 4) | table)?;
        }
        // Spectral selection start (Ss) - 0 for baseline
        payload.write_u8(0)?;
        // Spectral selection end (Se) - 63 for baseline
        payload.write_u8(63)?;
        // Successive approximation (Ah, Al) - 0 for baseline
        payload.write_u8(0)?;
        self.write_segment(Marker::SOS, &payload)
    }

    pub fn write_eoi(&mut self) -> Result<()> {
        self.write_marker(Marker::EOI)
    }

    /// Raw entropy-coded data, already byte-stuffed.
    pub fn write_scan_data(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (marker byte, declared length) for every segment up to SOS.
    fn segments(bytes: &[u8]) -> Vec<(u8, u16)> {
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let mut out = Vec::new();
        let mut pos = 2;
        while pos < bytes.len() {
            assert_eq!(bytes[pos], 0xFF);
            let marker = bytes[pos + 1];
            let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]);
            out.push((marker, length));
            pos += 2 + length as usize;
        }
        assert_eq!(pos, bytes.len());
        out
    }

    fn headers(width: u16, height: u16) -> Vec<u8> {
        let mut writer = ContainerWriter::new(Vec::new());
        writer
            .write_headers(
                width,
                height,
                &QuantizationTable::luminance(50),
                &QuantizationTable::chrominance(50),
                &HuffmanTables::standard().unwrap(),
            )
            .unwrap();
        writer.into_inner()
    }

    #[test]
    fn header_segments_have_reference_order_and_lengths() {
        let bytes = headers(16, 8);
        assert_eq!(
            segments(&bytes),
            vec![
                (0xE0, 16),
                (0xDB, 132),
                (0xC0, 17),
                (0xC4, 0x01A2),
                (0xDA, 12),
            ]
        );
    }

    #[test]
    fn app0_is_jfif_1_1() {
        let bytes = headers(8, 8);
        assert_eq!(
            &bytes[2..20],
            &[
                0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 1, 1, 0, 0, 1, 0, 1, 0, 0
            ]
        );
    }

    #[test]
    fn sof0_stores_height_before_width() {
        let bytes = headers(640, 480);
        let sof = bytes
            .windows(2)
            .position(|w| w == [0xFF, 0xC0])
            .unwrap();
        assert_eq!(
            &bytes[sof..sof + 19],
            &[
                0xFF, 0xC0, 0x00, 17, 8, 0x01, 0xE0, 0x02, 0x80, 3, 1, 0x11, 0, 2, 0x11, 1, 3,
                0x11, 1
            ]
        );
    }

    #[test]
    fn dqt_carries_both_tables_in_zigzag_order() {
        let luma = QuantizationTable::luminance(50);
        let chroma = QuantizationTable::chrominance(50);
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_dqt(&[&luma, &chroma]).unwrap();
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), 2 + 132);
        assert_eq!(bytes[4], 0);
        assert_eq!(&bytes[5..69], &luma.values);
        assert_eq!(bytes[69], 1);
        assert_eq!(&bytes[70..134], &chroma.values);
    }

    #[test]
    fn dht_tables_are_in_class_id_order() {
        let tables = HuffmanTables::standard().unwrap();
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_dht(&tables).unwrap();
        let bytes = writer.into_inner();

        let mut pos = 4;
        let mut ids = Vec::new();
        while pos < bytes.len() {
            ids.push(bytes[pos]);
            let count: usize = bytes[pos + 1..pos + 17].iter().map(|&n| n as usize).sum();
            pos += 17 + count;
        }
        assert_eq!(ids, vec![0x00, 0x10, 0x01, 0x11]);
        assert_eq!(pos, bytes.len());
    }

    #[test]
    fn sos_selects_luma_and_chroma_tables() {
        let mut writer = ContainerWriter::new(Vec::new());
        writer.write_sos().unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![0xFF, 0xDA, 0x00, 12, 3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0]
        );
    }
}
