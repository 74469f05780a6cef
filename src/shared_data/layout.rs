//! On-region layout of the shared data area
//!
//! ```text
//! Area:   Header { magic: u16, total_length: u16 }  Entry*
//! Entry:  type: u16  length: u16  payload: [u8; length]
//! ```
//!
//! All fields are little-endian and entries are packed back to back with no
//! padding. `total_length` is the end offset of the last committed entry,
//! header included.
//!
//! The entry type packs a 4-bit major id (producer / category) above a 12-bit
//! minor id (fact within the category).

use std::fmt;

/// Magic value marking a valid area header
pub const SHARED_DATA_TLV_INFO_MAGIC: u16 = 0x2016;

/// Size of the area header in bytes
pub const SHARED_DATA_HEADER_SIZE: usize = 4;

/// Size of an entry header (type + length) in bytes
pub const SHARED_DATA_ENTRY_HEADER_SIZE: usize = 4;

/// Smallest region the area can live in: the header plus one empty entry
pub const SHARED_MEMORY_MIN_SIZE: usize = 8;

pub const MAJOR_MASK: u8 = 0xF;
pub const MAJOR_POS: u32 = 12;
pub const MINOR_MASK: u16 = 0x0FFF;

/// Full size of an entry carrying `payload_len` bytes.
pub const fn entry_size(payload_len: usize) -> usize {
    payload_len + SHARED_DATA_ENTRY_HEADER_SIZE
}

/// Entry key: major category plus minor fact id.
///
/// Both halves are range-checked at construction so encoding never loses
/// bits and two distinct keys never share a packed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TlvType {
    major: u8,
    minor: u16,
}

impl TlvType {
    /// Returns `None` when `major` exceeds 4 bits or `minor` exceeds 12 bits.
    pub fn new(major: u8, minor: u16) -> Option<Self> {
        if major > MAJOR_MASK || minor > MINOR_MASK {
            return None;
        }
        Some(Self { major, minor })
    }

    pub fn major(self) -> u8 {
        self.major
    }

    pub fn minor(self) -> u16 {
        self.minor
    }

    /// Packed on-region form: `major << 12 | minor`
    pub fn encode(self) -> u16 {
        ((self.major as u16) << MAJOR_POS) | self.minor
    }

    /// Unpack a stored type field. Every `u16` maps to exactly one key.
    pub fn decode(raw: u16) -> Self {
        Self {
            major: (raw >> MAJOR_POS) as u8,
            minor: raw & MINOR_MASK,
        }
    }
}

impl fmt::Display for TlvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}/{:#05x}", self.major, self.minor)
    }
}

/// Area header, rewritten at offset 0 by every successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaHeader {
    pub magic: u16,
    pub total_length: u16,
}

impl AreaHeader {
    /// Header with the valid magic and the given committed length
    pub fn new(total_length: u16) -> Self {
        Self {
            magic: SHARED_DATA_TLV_INFO_MAGIC,
            total_length,
        }
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == SHARED_DATA_TLV_INFO_MAGIC
    }

    pub fn to_bytes(self) -> [u8; SHARED_DATA_HEADER_SIZE] {
        let magic = self.magic.to_le_bytes();
        let total = self.total_length.to_le_bytes();
        [magic[0], magic[1], total[0], total[1]]
    }

    pub fn from_bytes(buf: &[u8; SHARED_DATA_HEADER_SIZE]) -> Self {
        Self {
            magic: u16::from_le_bytes([buf[0], buf[1]]),
            total_length: u16::from_le_bytes([buf[2], buf[3]]),
        }
    }
}

/// Per-entry header preceding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader {
    pub tlv_type: TlvType,
    pub length: u16,
}

impl EntryHeader {
    pub fn new(tlv_type: TlvType, length: u16) -> Self {
        Self { tlv_type, length }
    }

    /// Stride to the next entry: header plus payload
    pub fn entry_size(&self) -> usize {
        entry_size(self.length as usize)
    }

    pub fn to_bytes(self) -> [u8; SHARED_DATA_ENTRY_HEADER_SIZE] {
        let tlv_type = self.tlv_type.encode().to_le_bytes();
        let length = self.length.to_le_bytes();
        [tlv_type[0], tlv_type[1], length[0], length[1]]
    }

    pub fn from_bytes(buf: &[u8; SHARED_DATA_ENTRY_HEADER_SIZE]) -> Self {
        Self {
            tlv_type: TlvType::decode(u16::from_le_bytes([buf[0], buf[1]])),
            length: u16::from_le_bytes([buf[2], buf[3]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_packing_matches_layout() {
        let key = TlvType::new(0x3, 0x004).unwrap();
        assert_eq!(key.encode(), 0x3004);
        assert_eq!(TlvType::decode(0x3004), key);
    }

    #[test]
    fn test_type_range_checked() {
        assert!(TlvType::new(0xF, 0xFFF).is_some());
        assert!(TlvType::new(0x10, 0).is_none());
        assert!(TlvType::new(0, 0x1000).is_none());
    }

    #[test]
    fn test_decode_covers_every_raw_value() {
        for raw in [0x0000u16, 0x0FFF, 0x1000, 0xF001, 0xFFFF] {
            assert_eq!(TlvType::decode(raw).encode(), raw);
        }
    }

    #[test]
    fn test_area_header_bytes_little_endian() {
        let header = AreaHeader::new(0x0018);
        assert_eq!(header.to_bytes(), [0x16, 0x20, 0x18, 0x00]);
        assert!(AreaHeader::from_bytes(&header.to_bytes()).has_valid_magic());
    }

    #[test]
    fn test_zeroed_header_has_no_magic() {
        assert!(!AreaHeader::from_bytes(&[0; 4]).has_valid_magic());
    }

    #[test]
    fn test_entry_header_bytes() {
        let header = EntryHeader::new(TlvType::new(5, 1).unwrap(), 1);
        assert_eq!(header.to_bytes(), [0x01, 0x50, 0x01, 0x00]);
        assert_eq!(header.entry_size(), 5);
    }

    #[test]
    fn test_display() {
        let key = TlvType::new(3, 5).unwrap();
        assert_eq!(key.to_string(), "0x3/0x005");
    }
}
