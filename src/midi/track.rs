//! MIDI track buffers
//!
//! Each logical track owns an append-only byte buffer that accumulates raw
//! MIDI events as the BMS tape is decoded. Buffers are only read back by the
//! file writer once decoding has finished.

/// One logical MIDI track
#[derive(Debug, Clone, Default)]
pub struct MidiTrack {
    /// Assigned MIDI channel; `None` for the meta track
    pub channel: Option<u8>,
    data: Vec<u8>,
}

impl MidiTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single byte
    pub fn write_u8(&mut self, val: u8) {
        self.data.push(val);
    }

    /// Append a 24-bit big-endian value
    pub fn write_u24(&mut self, val: u32) {
        self.data.push((val >> 16) as u8);
        self.data.push((val >> 8) as u8);
        self.data.push(val as u8);
    }

    /// Append a MIDI variable-length quantity
    ///
    /// Minimal big-endian base-128 encoding; every byte except the last has
    /// its high bit set. Zero encodes as a single `0x00` byte.
    pub fn write_varlen(&mut self, mut val: u32) {
        let mut buf = [0u8; 5];
        let mut i = buf.len() - 1;
        buf[i] = (val & 0x7F) as u8;
        val >>= 7;
        while val != 0 {
            i -= 1;
            buf[i] = ((val & 0x7F) as u8) | 0x80;
            val >>= 7;
        }
        self.data.extend_from_slice(&buf[i..]);
    }

    /// Byte length of the track buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw event bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(val: u32) -> Vec<u8> {
        let mut track = MidiTrack::new();
        track.write_varlen(val);
        track.bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> u32 {
        let mut val = 0u32;
        for &b in bytes {
            val = (val << 7) | (b & 0x7F) as u32;
        }
        val
    }

    #[test]
    fn test_varlen_reference_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x81, 0x00]);
        assert_eq!(encode(16383), vec![0xFF, 0x7F]);
        assert_eq!(encode(16384), vec![0x81, 0x80, 0x00]);
        assert_eq!(encode(2097151), vec![0xFF, 0xFF, 0x7F]);
        assert_eq!(encode(0x0FFF_FFFF), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_varlen_round_trip() {
        for val in (0..0x0FFF_FFFFu32).step_by(65521) {
            let bytes = encode(val);
            assert_eq!(decode(&bytes), val, "round trip failed for {}", val);
            // all continuation bits set except the last byte
            let (last, rest) = bytes.split_last().unwrap();
            assert_eq!(last & 0x80, 0);
            assert!(rest.iter().all(|b| b & 0x80 != 0));
        }
    }

    #[test]
    fn test_varlen_is_minimal() {
        assert_eq!(encode(1).len(), 1);
        assert_eq!(encode(128).len(), 2);
        assert_eq!(encode(16384).len(), 3);
        assert_eq!(encode(2097152).len(), 4);
    }

    #[test]
    fn test_write_u24() {
        let mut track = MidiTrack::new();
        track.write_u24(0x07A120); // 500000
        assert_eq!(track.bytes(), &[0x07, 0xA1, 0x20]);
    }
}
