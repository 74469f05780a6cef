//! Bootloader information handed to the application
//!
//! The bootloader records six facts about itself under the BLINFO major
//! type: operating mode, signature type, recovery mode, running slot,
//! bootloader version and maximum application size. The application decodes
//! them with [`BootInfo::load`].

mod record;
mod types;

pub use record::{save_shared_data, BootInfo};
pub use types::{
    blinfo, BootMode, ImageVersion, RecoveryMode, SignatureType, TLV_MAJOR_BLINFO, TLV_MAJOR_FWU,
    TLV_MAJOR_IAS,
};
