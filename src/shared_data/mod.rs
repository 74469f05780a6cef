//! Shared data area
//!
//! A bounded, append-only TLV log in a small retained region. The bootloader
//! appends one entry per fact; the booted application reads them back.
//!
//! # Design Principles
//!
//! - Append-only (no deletion, no update in place)
//! - One entry per `(major, minor)` key
//! - Cleared once per boot session, on the first append
//! - The area header commit is what makes an entry visible
//! - No retry and no rollback; failures go straight back to the caller

mod errors;
mod layout;
mod reader;
mod writer;

pub use errors::{
    status_of, SharedDataError, SharedDataErrorCode, SharedDataResult, SHARED_MEMORY_OK,
};
pub use layout::{
    entry_size, AreaHeader, EntryHeader, TlvType, SHARED_DATA_ENTRY_HEADER_SIZE,
    SHARED_DATA_HEADER_SIZE, SHARED_DATA_TLV_INFO_MAGIC, SHARED_MEMORY_MIN_SIZE,
};
pub use reader::{SharedAreaReader, TlvEntry};
pub use writer::SharedArea;
