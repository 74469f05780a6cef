//! Shared data area consumer
//!
//! The next boot stage reads the area through [`SharedAreaReader`]. Only
//! entries below the header's `total_length` are visible; anything past it
//! (an entry whose header commit never happened) is ignored.
//!
//! The reader trusts nothing it has not checked:
//! - the header must carry the magic value
//! - `total_length` must lie between the header size and the capacity
//! - every entry must end at or before `total_length`

use super::errors::{SharedDataError, SharedDataResult};
use super::layout::{
    AreaHeader, EntryHeader, TlvType, SHARED_DATA_ENTRY_HEADER_SIZE, SHARED_DATA_HEADER_SIZE,
};
use crate::backing::BackingStore;

/// One committed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvEntry {
    /// Entry key
    pub tlv_type: TlvType,
    /// Offset of the entry header inside the region
    pub offset: usize,
    /// Payload bytes
    pub payload: Vec<u8>,
}

impl TlvEntry {
    pub fn major(&self) -> u8 {
        self.tlv_type.major()
    }

    pub fn minor(&self) -> u16 {
        self.tlv_type.minor()
    }
}

/// Header-driven sequential reader.
#[derive(Debug)]
pub struct SharedAreaReader<S> {
    store: S,
    header: AreaHeader,
    /// Offset of the next entry header
    current_offset: usize,
}

impl<S: BackingStore> SharedAreaReader<S> {
    /// Reads and validates the area header.
    ///
    /// # Errors
    ///
    /// - `SHARED_MEMORY_READ_ERROR` if the header cannot be read
    /// - `SHARED_MEMORY_CORRUPTION` if the magic is missing or `total_length`
    ///   is out of bounds
    pub fn open(mut store: S) -> SharedDataResult<Self> {
        let capacity = store.capacity();
        if capacity < SHARED_DATA_HEADER_SIZE {
            return Err(SharedDataError::corruption(format!(
                "Region of {} bytes cannot hold an area header",
                capacity
            )));
        }

        let mut buf = [0u8; SHARED_DATA_HEADER_SIZE];
        store
            .read(0, &mut buf)
            .map_err(|e| SharedDataError::read_failed("Failed to read area header", e))?;
        let header = AreaHeader::from_bytes(&buf);

        if !header.has_valid_magic() {
            return Err(SharedDataError::corruption_at_offset(
                0,
                format!("Area header magic missing: found {:#06x}", header.magic),
            ));
        }

        let total = header.total_length as usize;
        if total < SHARED_DATA_HEADER_SIZE || total > capacity {
            return Err(SharedDataError::corruption_at_offset(
                2,
                format!(
                    "Total length {} outside [{}, {}]",
                    total, SHARED_DATA_HEADER_SIZE, capacity
                ),
            ));
        }

        Ok(Self {
            store,
            header,
            current_offset: SHARED_DATA_HEADER_SIZE,
        })
    }

    /// End offset of the last committed entry
    pub fn total_length(&self) -> usize {
        self.header.total_length as usize
    }

    /// Returns whether there are more entries to read.
    pub fn has_more(&self) -> bool {
        self.current_offset < self.total_length()
    }

    /// Reads the next entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` if an entry was read
    /// - `Ok(None)` at `total_length`
    /// - `Err(SHARED_MEMORY_CORRUPTION)` if an entry crosses `total_length`
    pub fn read_next(&mut self) -> SharedDataResult<Option<TlvEntry>> {
        let total = self.total_length();
        let offset = self.current_offset;
        if offset >= total {
            return Ok(None);
        }

        let remaining = total - offset;
        if remaining < SHARED_DATA_ENTRY_HEADER_SIZE {
            return Err(SharedDataError::corruption_at_offset(
                offset,
                format!("Truncated entry header: {} bytes remaining", remaining),
            ));
        }

        let mut buf = [0u8; SHARED_DATA_ENTRY_HEADER_SIZE];
        self.store
            .read(offset, &mut buf)
            .map_err(|e| SharedDataError::read_failed("Failed to read entry header", e))?;
        let header = EntryHeader::from_bytes(&buf);

        if header.entry_size() > remaining {
            return Err(SharedDataError::corruption_at_offset(
                offset,
                format!(
                    "Entry {} of {} bytes crosses total length {}",
                    header.tlv_type,
                    header.entry_size(),
                    total
                ),
            ));
        }

        let mut payload = vec![0u8; header.length as usize];
        self.store
            .read(offset + SHARED_DATA_ENTRY_HEADER_SIZE, &mut payload)
            .map_err(|e| SharedDataError::read_failed("Failed to read entry payload", e))?;

        self.current_offset += header.entry_size();

        Ok(Some(TlvEntry {
            tlv_type: header.tlv_type,
            offset,
            payload,
        }))
    }

    /// Reads all remaining entries. Any corruption fails the whole read.
    pub fn read_all(&mut self) -> SharedDataResult<Vec<TlvEntry>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_next()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Rewinds to the first entry.
    pub fn reset(&mut self) {
        self.current_offset = SHARED_DATA_HEADER_SIZE;
    }

    /// First entry with the given key, scanning from the start.
    pub fn find(&mut self, major: u8, minor: u16) -> SharedDataResult<Option<TlvEntry>> {
        self.reset();
        while let Some(entry) = self.read_next()? {
            if entry.major() == major && entry.minor() == minor {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
