//! Backing store capability for the shared data area
//!
//! The shared data log never touches hardware directly. Everything it does goes
//! through [`BackingStore`]: a fixed-size, byte-addressable region that can be
//! cleared, read and written at offsets.
//!
//! Implementations:
//! - [`MemoryStore`]: fixed in-memory arena (retained RAM stand-in)
//! - [`FileStore`]: fixed-size image file, synced on every write
//! - [`FaultyStore`]: wrapper that fails selected operations on demand

mod errors;
mod fault;
mod file;
mod memory;

pub use errors::{BackingError, BackingResult};
pub use fault::FaultyStore;
pub use file::FileStore;
pub use memory::MemoryStore;

pub(crate) use errors::check_bounds;

/// Byte-addressable persistent region of fixed size.
///
/// All offsets are absolute from the start of the region. An access that does
/// not fit inside [`capacity`](BackingStore::capacity) fails with
/// [`BackingError::OutOfBounds`] and transfers nothing.
pub trait BackingStore {
    /// Erase the whole region to its empty state (all zero bytes).
    fn clear(&mut self) -> BackingResult<()>;

    /// Usable size of the region in bytes. Stable for the lifetime of the store.
    fn capacity(&self) -> usize;

    /// Fill `buf` with the bytes at `offset..offset + buf.len()`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> BackingResult<()>;

    /// Write `data` at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> BackingResult<()>;
}

impl<S: BackingStore + ?Sized> BackingStore for &mut S {
    fn clear(&mut self) -> BackingResult<()> {
        (**self).clear()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> BackingResult<()> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> BackingResult<()> {
        (**self).write(offset, data)
    }
}
