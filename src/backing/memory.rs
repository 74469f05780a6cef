//! # In-Memory Backing Store

use super::{check_bounds, BackingResult, BackingStore};

/// Fixed-capacity byte arena.
///
/// Stands in for a retained RAM region. The arena is allocated once and never
/// grows; clearing zero-fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    bytes: Vec<u8>,
}

impl MemoryStore {
    /// Create a zeroed region of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    /// Create a region holding a copy of existing content, e.g. an area image
    /// handed over by a previous stage.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw view of the whole region
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the store, returning the region contents
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl BackingStore for MemoryStore {
    fn clear(&mut self) -> BackingResult<()> {
        self.bytes.fill(0);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> BackingResult<()> {
        check_bounds(offset, buf.len(), self.bytes.len())?;
        buf.copy_from_slice(&self.bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> BackingResult<()> {
        check_bounds(offset, data.len(), self.bytes.len())?;
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}
