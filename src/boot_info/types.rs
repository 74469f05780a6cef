//! Bootloader information values
//!
//! Each enum is stored as a single byte. The numbering is shared with the
//! application that reads the area and must not change.

use serde::{Deserialize, Serialize};

/// Producer categories (entry major ids)
pub const TLV_MAJOR_IAS: u8 = 0x1;
pub const TLV_MAJOR_FWU: u8 = 0x2;
pub const TLV_MAJOR_BLINFO: u8 = 0x3;

/// Facts recorded under [`TLV_MAJOR_BLINFO`] (entry minor ids)
pub mod blinfo {
    pub const MODE: u16 = 0x00;
    pub const SIGNATURE_TYPE: u16 = 0x01;
    pub const RECOVERY: u16 = 0x02;
    pub const RUNNING_SLOT: u16 = 0x03;
    pub const BOOTLOADER_VERSION: u16 = 0x04;
    pub const MAX_APPLICATION_SIZE: u16 = 0x05;
}

/// Image update strategy the bootloader was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BootMode {
    SingleSlot = 0,
    SwapUsingScratch = 1,
    UpgradeOnly = 2,
    SwapUsingMove = 3,
    DirectXip = 4,
    DirectXipWithRevert = 5,
    RamLoad = 6,
}

impl BootMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(BootMode::SingleSlot),
            1 => Some(BootMode::SwapUsingScratch),
            2 => Some(BootMode::UpgradeOnly),
            3 => Some(BootMode::SwapUsingMove),
            4 => Some(BootMode::DirectXip),
            5 => Some(BootMode::DirectXipWithRevert),
            6 => Some(BootMode::RamLoad),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Signature scheme used to verify images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SignatureType {
    None = 0,
    Rsa = 1,
    EcdsaP256 = 2,
    Ed25519 = 3,
}

impl SignatureType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SignatureType::None),
            1 => Some(SignatureType::Rsa),
            2 => Some(SignatureType::EcdsaP256),
            3 => Some(SignatureType::Ed25519),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Recovery channel compiled into the bootloader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RecoveryMode {
    None = 0,
    SerialRecovery = 1,
    Dfu = 2,
}

impl RecoveryMode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecoveryMode::None),
            1 => Some(RecoveryMode::SerialRecovery),
            2 => Some(RecoveryMode::Dfu),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Bootloader version, stored as 8 little-endian bytes:
/// major (u8), minor (u8), revision (u16), build number (u32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageVersion {
    pub major: u8,
    pub minor: u8,
    #[serde(default)]
    pub revision: u16,
    #[serde(default)]
    pub build_num: u32,
}

impl ImageVersion {
    pub const ENCODED_LEN: usize = 8;

    pub fn new(major: u8, minor: u8, revision: u16, build_num: u32) -> Self {
        Self {
            major,
            minor,
            revision,
            build_num,
        }
    }

    pub fn to_bytes(self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0u8; Self::ENCODED_LEN];
        buf[0] = self.major;
        buf[1] = self.minor;
        buf[2..4].copy_from_slice(&self.revision.to_le_bytes());
        buf[4..8].copy_from_slice(&self.build_num.to_le_bytes());
        buf
    }

    /// Returns `None` unless `data` is exactly 8 bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() != Self::ENCODED_LEN {
            return None;
        }
        Some(Self {
            major: data[0],
            minor: data[1],
            revision: u16::from_le_bytes([data[2], data[3]]),
            build_num: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
        })
    }
}

impl std::fmt::Display for ImageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}+{}",
            self.major, self.minor, self.revision, self.build_num
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_byte_values() {
        assert_eq!(BootMode::SwapUsingMove.as_u8(), 3);
        assert_eq!(BootMode::RamLoad.as_u8(), 6);
        assert_eq!(SignatureType::EcdsaP256.as_u8(), 2);
        assert_eq!(RecoveryMode::Dfu.as_u8(), 2);
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        assert_eq!(BootMode::from_u8(7), None);
        assert_eq!(SignatureType::from_u8(4), None);
        assert_eq!(RecoveryMode::from_u8(3), None);
    }

    #[test]
    fn test_version_layout() {
        let version = ImageVersion::new(2, 1, 0x0304, 0x0A0B0C0D);
        assert_eq!(
            version.to_bytes(),
            [0x02, 0x01, 0x04, 0x03, 0x0D, 0x0C, 0x0B, 0x0A]
        );
        assert_eq!(ImageVersion::from_bytes(&version.to_bytes()), Some(version));
        assert_eq!(ImageVersion::from_bytes(&[0; 7]), None);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(ImageVersion::new(1, 2, 3, 4).to_string(), "1.2.3+4");
    }

    #[test]
    fn test_serde_names() {
        let mode: BootMode = serde_json::from_str("\"swap_using_scratch\"").unwrap();
        assert_eq!(mode, BootMode::SwapUsingScratch);
        let sig: SignatureType = serde_json::from_str("\"ed25519\"").unwrap();
        assert_eq!(sig, SignatureType::Ed25519);
        assert_eq!(
            serde_json::to_string(&RecoveryMode::SerialRecovery).unwrap(),
            "\"serial_recovery\""
        );
    }
}
