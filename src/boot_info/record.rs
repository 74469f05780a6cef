//! Boot info record: the six BLINFO facts as one value

use serde::{Deserialize, Serialize};

use super::types::{
    blinfo, BootMode, ImageVersion, RecoveryMode, SignatureType, TLV_MAJOR_BLINFO,
};
use crate::backing::BackingStore;
use crate::observability::{log_event_with_fields, Event};
use crate::shared_data::{SharedArea, SharedAreaReader, SharedDataError, SharedDataResult};

/// Everything the bootloader tells the application about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootInfo {
    pub mode: BootMode,
    pub signature_type: SignatureType,
    pub recovery: RecoveryMode,
    /// Slot the running image was booted from
    pub running_slot: u32,
    pub bootloader_version: ImageVersion,
    /// Largest image the application slot can hold, in bytes
    pub max_application_size: u32,
}

impl BootInfo {
    /// Encoded entries in write order
    fn entries(&self) -> [(u16, Vec<u8>); 6] {
        [
            (blinfo::MODE, vec![self.mode.as_u8()]),
            (blinfo::SIGNATURE_TYPE, vec![self.signature_type.as_u8()]),
            (blinfo::RECOVERY, vec![self.recovery.as_u8()]),
            (blinfo::RUNNING_SLOT, self.running_slot.to_le_bytes().to_vec()),
            (
                blinfo::BOOTLOADER_VERSION,
                self.bootloader_version.to_bytes().to_vec(),
            ),
            (
                blinfo::MAX_APPLICATION_SIZE,
                self.max_application_size.to_le_bytes().to_vec(),
            ),
        ]
    }

    /// Bytes the six entries occupy in the area, entry headers included
    pub fn encoded_size(&self) -> usize {
        self.entries()
            .iter()
            .map(|(_, payload)| crate::shared_data::entry_size(payload.len()))
            .sum()
    }

    /// Writes every fact under [`TLV_MAJOR_BLINFO`].
    ///
    /// Entries go out in minor id order. The first failure is returned and
    /// nothing after it is attempted, so a partial record is always a prefix.
    pub fn save<S: BackingStore>(&self, area: &mut SharedArea<S>) -> SharedDataResult<()> {
        for (minor, payload) in self.entries() {
            if let Err(e) = area.append(TLV_MAJOR_BLINFO, minor, &payload) {
                log_event_with_fields(
                    Event::BootInfoFailed,
                    &[
                        ("minor", minor.to_string().as_str()),
                        ("code", e.code().code()),
                    ],
                );
                return Err(e);
            }
        }

        log_event_with_fields(
            Event::BootInfoSaved,
            &[
                ("mode", format!("{:?}", self.mode).as_str()),
                ("slot", self.running_slot.to_string().as_str()),
                ("version", self.bootloader_version.to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// Decodes the six facts from a committed area.
    ///
    /// A missing entry, a payload of the wrong size, or an unknown enum byte
    /// is `SHARED_MEMORY_CORRUPTION`.
    pub fn load<S: BackingStore>(reader: &mut SharedAreaReader<S>) -> SharedDataResult<Self> {
        let mode = read_u8(reader, blinfo::MODE)?;
        let signature_type = read_u8(reader, blinfo::SIGNATURE_TYPE)?;
        let recovery = read_u8(reader, blinfo::RECOVERY)?;
        let running_slot = read_u32(reader, blinfo::RUNNING_SLOT)?;
        let version = read_exact(reader, blinfo::BOOTLOADER_VERSION, ImageVersion::ENCODED_LEN)?;
        let max_application_size = read_u32(reader, blinfo::MAX_APPLICATION_SIZE)?;

        Ok(Self {
            mode: BootMode::from_u8(mode)
                .ok_or_else(|| unknown_value("boot mode", mode))?,
            signature_type: SignatureType::from_u8(signature_type)
                .ok_or_else(|| unknown_value("signature type", signature_type))?,
            recovery: RecoveryMode::from_u8(recovery)
                .ok_or_else(|| unknown_value("recovery mode", recovery))?,
            running_slot,
            bootloader_version: ImageVersion::from_bytes(&version)
                .ok_or_else(|| SharedDataError::corruption("Malformed bootloader version"))?,
            max_application_size,
        })
    }
}

/// Writes `info` into `area`. See [`BootInfo::save`].
pub fn save_shared_data<S: BackingStore>(
    area: &mut SharedArea<S>,
    info: &BootInfo,
) -> SharedDataResult<()> {
    info.save(area)
}

fn read_exact<S: BackingStore>(
    reader: &mut SharedAreaReader<S>,
    minor: u16,
    len: usize,
) -> SharedDataResult<Vec<u8>> {
    let entry = reader.find(TLV_MAJOR_BLINFO, minor)?.ok_or_else(|| {
        SharedDataError::corruption(format!("Boot info entry {} missing", minor))
    })?;

    if entry.payload.len() != len {
        return Err(SharedDataError::corruption_at_offset(
            entry.offset,
            format!(
                "Boot info entry {} has {} bytes, expected {}",
                minor,
                entry.payload.len(),
                len
            ),
        ));
    }
    Ok(entry.payload)
}

fn read_u8<S: BackingStore>(reader: &mut SharedAreaReader<S>, minor: u16) -> SharedDataResult<u8> {
    Ok(read_exact(reader, minor, 1)?[0])
}

fn read_u32<S: BackingStore>(
    reader: &mut SharedAreaReader<S>,
    minor: u16,
) -> SharedDataResult<u32> {
    let bytes = read_exact(reader, minor, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn unknown_value(what: &str, value: u8) -> SharedDataError {
    SharedDataError::corruption(format!("Unknown {} value {}", what, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::{FaultyStore, MemoryStore};
    use crate::shared_data::SharedDataErrorCode;

    fn sample() -> BootInfo {
        BootInfo {
            mode: BootMode::SwapUsingMove,
            signature_type: SignatureType::EcdsaP256,
            recovery: RecoveryMode::SerialRecovery,
            running_slot: 1,
            bootloader_version: ImageVersion::new(2, 1, 0, 7),
            max_application_size: 0x0007_4000,
        }
    }

    #[test]
    fn test_encoded_size() {
        // three 1-byte facts, two u32 facts, one 8-byte version
        assert_eq!(sample().encoded_size(), 3 * 5 + 2 * 8 + 12);
    }

    #[test]
    fn test_save_then_load() {
        let mut area = SharedArea::new(MemoryStore::new(64));
        save_shared_data(&mut area, &sample()).unwrap();

        let mut reader = SharedAreaReader::open(area.into_inner()).unwrap();
        assert_eq!(BootInfo::load(&mut reader).unwrap(), sample());
    }

    #[test]
    fn test_save_writes_in_minor_order() {
        let mut area = SharedArea::new(MemoryStore::new(64));
        sample().save(&mut area).unwrap();

        let mut reader = SharedAreaReader::open(area.into_inner()).unwrap();
        let minors: Vec<u16> = reader.read_all().unwrap().iter().map(|e| e.minor()).collect();
        assert_eq!(minors, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_save_stops_at_first_failure() {
        let mut area = SharedArea::new(FaultyStore::new(MemoryStore::new(64)));
        // three writes per entry: the fourth entry's header write is index 9
        area.store_mut().fail_write(9);

        let err = sample().save(&mut area).unwrap_err();
        assert_eq!(err.code(), SharedDataErrorCode::WriteError);
        assert_eq!(area.store().writes(), 10);

        let mut reader = SharedAreaReader::open(area.into_inner().into_inner()).unwrap();
        assert_eq!(reader.read_all().unwrap().len(), 3);
    }

    #[test]
    fn test_save_twice_in_one_session_is_overwrite() {
        let mut area = SharedArea::new(MemoryStore::new(64));
        sample().save(&mut area).unwrap();
        let err = sample().save(&mut area).unwrap_err();
        assert_eq!(err.code(), SharedDataErrorCode::Overwrite);
    }

    #[test]
    fn test_save_overflow_in_small_region() {
        let mut area = SharedArea::new(MemoryStore::new(32));
        let err = sample().save(&mut area).unwrap_err();
        assert_eq!(err.code(), SharedDataErrorCode::Overflow);
    }

    #[test]
    fn test_load_missing_entry() {
        let mut area = SharedArea::new(MemoryStore::new(64));
        area.append(TLV_MAJOR_BLINFO, blinfo::MODE, &[0]).unwrap();

        let mut reader = SharedAreaReader::open(area.into_inner()).unwrap();
        let err = BootInfo::load(&mut reader).unwrap_err();
        assert_eq!(err.code(), SharedDataErrorCode::Corruption);
        assert!(err.message().contains("missing"));
    }

    #[test]
    fn test_load_unknown_mode() {
        let mut info_area = SharedArea::new(MemoryStore::new(64));
        info_area.append(TLV_MAJOR_BLINFO, blinfo::MODE, &[0x42]).unwrap();
        for (minor, payload) in sample().entries().into_iter().skip(1) {
            info_area.append(TLV_MAJOR_BLINFO, minor, &payload).unwrap();
        }

        let mut reader = SharedAreaReader::open(info_area.into_inner()).unwrap();
        let err = BootInfo::load(&mut reader).unwrap_err();
        assert!(err.message().contains("boot mode"));
    }

    #[test]
    fn test_load_ignores_other_majors() {
        let mut area = SharedArea::new(MemoryStore::new(96));
        area.append(crate::boot_info::TLV_MAJOR_IAS, blinfo::MODE, b"ias").unwrap();
        sample().save(&mut area).unwrap();

        let mut reader = SharedAreaReader::open(area.into_inner()).unwrap();
        assert_eq!(BootInfo::load(&mut reader).unwrap(), sample());
    }
}
