//! Shared data area producer
//!
//! One [`SharedArea`] exists per boot session. The first append clears the
//! region; every later append scans the committed entries for a duplicate key,
//! checks capacity, then commits in three writes:
//!
//! 1. entry header at the cursor
//! 2. payload right after it
//! 3. area header at offset 0
//!
//! The area header write is the point at which an entry becomes visible to a
//! reader bounded by `total_length`. Nothing is rolled back on failure: bytes
//! already written by an aborted sub-step stay in the region.

use super::errors::{SharedDataError, SharedDataResult};
use super::layout::{
    entry_size, AreaHeader, EntryHeader, TlvType, SHARED_DATA_ENTRY_HEADER_SIZE,
    SHARED_DATA_HEADER_SIZE,
};
use crate::backing::BackingStore;
use crate::observability::{log_event_with_fields, Event};

/// Append-only TLV log over a backing store.
#[derive(Debug)]
pub struct SharedArea<S> {
    /// Region the log lives in
    store: S,
    /// Set once the region has been cleared this session
    initialized: bool,
    /// Next free byte offset; equals the committed length once initialized
    cursor: usize,
    /// Region size captured at initialization
    capacity: usize,
}

impl<S: BackingStore> SharedArea<S> {
    /// Wrap a store for a new session. No I/O happens until the first append.
    pub fn new(store: S) -> Self {
        Self {
            store,
            initialized: false,
            cursor: SHARED_DATA_HEADER_SIZE,
            capacity: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Next free byte offset
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Region capacity, or `None` before the first append
    pub fn capacity(&self) -> Option<usize> {
        self.initialized.then_some(self.capacity)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Clears the region on the first call of the session. Later calls do
    /// nothing.
    ///
    /// A failed clear leaves the store uninitialized so the next append
    /// tries again.
    pub fn ensure_initialized(&mut self) -> SharedDataResult<()> {
        if self.initialized {
            return Ok(());
        }

        if let Err(e) = self.store.clear() {
            log_event_with_fields(Event::ClearFailed, &[("error", e.to_string().as_str())]);
            return Err(SharedDataError::write_failed(
                "Failed to clear shared area",
                e,
            ));
        }

        self.capacity = self.store.capacity();
        self.cursor = SHARED_DATA_HEADER_SIZE;
        self.initialized = true;

        log_event_with_fields(
            Event::AreaInitialized,
            &[("capacity", self.capacity.to_string().as_str())],
        );
        Ok(())
    }

    /// Append one entry.
    ///
    /// # Errors
    ///
    /// - `SHARED_MEMORY_GEN_ERROR`: key out of range, or the new length does
    ///   not fit the 16-bit header field
    /// - `SHARED_MEMORY_OVERWRITE`: key already present
    /// - `SHARED_MEMORY_OVERFLOW`: entry does not fit the region
    /// - `SHARED_MEMORY_READ_ERROR`: duplicate scan failed
    /// - `SHARED_MEMORY_WRITE_ERROR`: clear or a commit write failed
    pub fn append(&mut self, major: u8, minor: u16, payload: &[u8]) -> SharedDataResult<()> {
        self.add_data(major, minor, Some(payload))
    }

    /// Append with an optional payload, for callers whose data may be absent.
    ///
    /// A missing payload fails with `SHARED_MEMORY_GEN_ERROR` before any I/O,
    /// including the first-use clear.
    pub fn add_data(
        &mut self,
        major: u8,
        minor: u16,
        data: Option<&[u8]>,
    ) -> SharedDataResult<()> {
        let data = data.ok_or_else(|| SharedDataError::generic("No payload supplied"))?;
        let key = TlvType::new(major, minor).ok_or_else(|| {
            SharedDataError::generic(format!(
                "Entry type out of range: major {}, minor {}",
                major, minor
            ))
        })?;

        self.ensure_initialized()?;
        self.reject_duplicate(key)?;
        let end = self.reserve(data.len())?;
        self.commit(key, data, end)
    }

    /// Walks entry headers from the first entry to the cursor. Only headers
    /// are read; the stride includes the payload.
    fn reject_duplicate(&mut self, key: TlvType) -> SharedDataResult<()> {
        let mut offset = SHARED_DATA_HEADER_SIZE;
        let mut buf = [0u8; SHARED_DATA_ENTRY_HEADER_SIZE];

        while offset < self.cursor {
            if let Err(e) = self.store.read(offset, &mut buf) {
                log_event_with_fields(
                    Event::ScanReadFailed,
                    &[
                        ("offset", offset.to_string().as_str()),
                        ("error", e.to_string().as_str()),
                    ],
                );
                return Err(SharedDataError::read_failed(
                    format!("Failed to read entry header at offset {}", offset),
                    e,
                ));
            }

            let header = EntryHeader::from_bytes(&buf);
            if header.tlv_type == key {
                log_event_with_fields(
                    Event::DuplicateRejected,
                    &[("type", key.to_string().as_str())],
                );
                return Err(SharedDataError::overwrite(key));
            }

            offset += header.entry_size();
        }

        Ok(())
    }

    /// Returns the new committed end for an entry of `payload_len` bytes.
    fn reserve(&self, payload_len: usize) -> SharedDataResult<usize> {
        let end = u16::try_from(entry_size(payload_len))
            .ok()
            .and_then(|size| u16::try_from(self.cursor).ok()?.checked_add(size))
            .ok_or_else(|| {
                SharedDataError::generic(format!(
                    "Entry of {} bytes overflows the 16-bit area length",
                    payload_len
                ))
            })? as usize;

        if end > self.capacity {
            log_event_with_fields(
                Event::OverflowRejected,
                &[
                    ("capacity", self.capacity.to_string().as_str()),
                    ("required", end.to_string().as_str()),
                ],
            );
            return Err(SharedDataError::overflow(end, self.capacity));
        }

        Ok(end)
    }

    fn commit(&mut self, key: TlvType, data: &[u8], end: usize) -> SharedDataResult<()> {
        let offset = self.cursor;
        // reserve() bounded the entry size by u16::MAX
        let entry = EntryHeader::new(key, data.len() as u16);

        if let Err(e) = self.store.write(offset, &entry.to_bytes()) {
            log_event_with_fields(
                Event::EntryWriteFailed,
                &[
                    ("step", "header"),
                    ("type", key.to_string().as_str()),
                    ("error", e.to_string().as_str()),
                ],
            );
            return Err(SharedDataError::write_failed(
                format!("Shared data TLV header write failed for {}", key),
                e,
            ));
        }

        if let Err(e) = self
            .store
            .write(offset + SHARED_DATA_ENTRY_HEADER_SIZE, data)
        {
            log_event_with_fields(
                Event::EntryWriteFailed,
                &[
                    ("step", "payload"),
                    ("type", key.to_string().as_str()),
                    ("error", e.to_string().as_str()),
                ],
            );
            return Err(SharedDataError::write_failed(
                format!("Shared data TLV data write failed for {}", key),
                e,
            ));
        }

        // The cursor moves before the header commit. If that commit fails the
        // entry stays in the scan range and the next successful commit covers it.
        self.cursor = end;

        let header = AreaHeader::new(end as u16);
        if let Err(e) = self.store.write(0, &header.to_bytes()) {
            log_event_with_fields(
                Event::HeaderCommitFailed,
                &[
                    ("total_length", end.to_string().as_str()),
                    ("error", e.to_string().as_str()),
                ],
            );
            return Err(SharedDataError::write_failed(
                "Shared data area header write failed",
                e,
            ));
        }

        log_event_with_fields(
            Event::EntryAppended,
            &[
                ("length", data.len().to_string().as_str()),
                ("offset", offset.to_string().as_str()),
                ("type", key.to_string().as_str()),
            ],
        );
        Ok(())
    }
}
