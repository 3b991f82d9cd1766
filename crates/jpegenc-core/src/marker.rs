//! JPEG marker codes written by the encoder.
//!
//! Adapted from [jpeg-decoder](https://github.com/image-rs/jpeg-decoder),
//! reduced to the markers of a baseline JFIF stream.

/// JPEG marker types (ITU T.81 Table B.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of Image.
    SOI,
    /// Application segment (0-15).
    APP(u8),
    /// Define Quantization Table.
    DQT,
    /// Start of Frame. Parameter indicates the SOF type; only 0 (baseline) is emitted.
    SOF(u8),
    /// Define Huffman Table.
    DHT,
    /// Start of Scan.
    SOS,
    /// End of Image.
    EOI,
}

impl Marker {
    /// Returns true if this marker has a length field following it.
    pub fn has_length(self) -> bool {
        !matches!(self, Marker::SOI | Marker::EOI)
    }

    /// Second byte of the marker, following `0xFF`.
    pub fn to_u8(self) -> u8 {
        use Marker::*;
        match self {
            SOI => 0xD8,
            APP(n) => 0xE0 + (n & 0x0F),
            DQT => 0xDB,
            SOF(n) => 0xC0 + (n & 0x0F),
            DHT => 0xC4,
            SOS => 0xDA,
            EOI => 0xD9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_codes() {
        assert_eq!(Marker::SOI.to_u8(), 0xD8);
        assert_eq!(Marker::APP(0).to_u8(), 0xE0);
        assert_eq!(Marker::DQT.to_u8(), 0xDB);
        assert_eq!(Marker::SOF(0).to_u8(), 0xC0);
        assert_eq!(Marker::DHT.to_u8(), 0xC4);
        assert_eq!(Marker::SOS.to_u8(), 0xDA);
        assert_eq!(Marker::EOI.to_u8(), 0xD9);
    }

    #[test]
    fn standalone_markers_have_no_length() {
        assert!(!Marker::SOI.has_length());
        assert!(!Marker::EOI.has_length());
        assert!(Marker::APP(0).has_length());
        assert!(Marker::SOS.has_length());
    }
}
