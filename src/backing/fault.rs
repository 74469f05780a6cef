//! Fault injection for the backing store
//!
//! [`FaultyStore`] wraps another store and fails selected operations so the
//! write and read failure paths of the shared data area can be driven
//! deterministically. Write calls are numbered from zero over the lifetime of
//! the wrapper.

use std::collections::BTreeSet;

use super::{BackingError, BackingResult, BackingStore};

/// Store wrapper that fails chosen operations.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    failing_writes: BTreeSet<usize>,
    fail_reads: bool,
    fail_clear: bool,
    /// A failing write still transfers the first half of its data
    torn_writes: bool,
    writes: usize,
    reads: usize,
    clears: usize,
}

impl<S: BackingStore> FaultyStore<S> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing_writes: BTreeSet::new(),
            fail_reads: false,
            fail_clear: false,
            torn_writes: false,
            writes: 0,
            reads: 0,
            clears: 0,
        }
    }

    /// Fail the write call with the given zero-based index.
    pub fn fail_write(&mut self, index: usize) -> &mut Self {
        self.failing_writes.insert(index);
        self
    }

    /// Fail the next write call.
    pub fn fail_next_write(&mut self) -> &mut Self {
        let next = self.writes;
        self.fail_write(next)
    }

    /// Fail every read while set.
    pub fn fail_reads(&mut self, fail: bool) -> &mut Self {
        self.fail_reads = fail;
        self
    }

    /// Fail every clear while set.
    pub fn fail_clear(&mut self, fail: bool) -> &mut Self {
        self.fail_clear = fail;
        self
    }

    /// Let failing writes land half of their bytes before failing.
    pub fn tear_writes(&mut self, torn: bool) -> &mut Self {
        self.torn_writes = torn;
        self
    }

    /// Disarm every pending fault.
    pub fn heal(&mut self) -> &mut Self {
        self.failing_writes.clear();
        self.fail_reads = false;
        self.fail_clear = false;
        self
    }

    /// Number of write calls seen, failed ones included
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of read calls seen
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of clear calls seen
    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: BackingStore> BackingStore for FaultyStore<S> {
    fn clear(&mut self) -> BackingResult<()> {
        self.clears += 1;
        if self.fail_clear {
            return Err(BackingError::Injected("clear"));
        }
        self.inner.clear()
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> BackingResult<()> {
        self.reads += 1;
        if self.fail_reads {
            return Err(BackingError::Injected("read"));
        }
        self.inner.read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> BackingResult<()> {
        let index = self.writes;
        self.writes += 1;

        if self.failing_writes.remove(&index) {
            if self.torn_writes {
                self.inner.write(offset, &data[..data.len() / 2])?;
            }
            return Err(BackingError::Injected("write"));
        }
        self.inner.write(offset, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::MemoryStore;

    #[test]
    fn test_fails_only_selected_write() {
        let mut store = FaultyStore::new(MemoryStore::new(8));
        store.fail_write(1);

        assert!(store.write(0, b"a").is_ok());
        assert!(store.write(1, b"b").unwrap_err().is_injected());
        assert!(store.write(2, b"c").is_ok());
        assert_eq!(store.writes(), 3);
        assert_eq!(&store.inner().as_bytes()[..3], &[b'a', 0, b'c']);
    }

    #[test]
    fn test_torn_write_lands_half() {
        let mut store = FaultyStore::new(MemoryStore::new(8));
        store.tear_writes(true).fail_next_write();

        assert!(store.write(0, b"abcd").is_err());
        assert_eq!(&store.inner().as_bytes()[..4], &[b'a', b'b', 0, 0]);
    }

    #[test]
    fn test_heal_disarms_faults() {
        let mut store = FaultyStore::new(MemoryStore::new(8));
        store.fail_reads(true).fail_clear(true).fail_next_write();
        store.heal();

        let mut buf = [0u8; 1];
        assert!(store.read(0, &mut buf).is_ok());
        assert!(store.clear().is_ok());
        assert!(store.write(0, b"x").is_ok());
    }

    #[test]
    fn test_counts_reads_and_clears() {
        let mut store = FaultyStore::new(MemoryStore::new(4));
        let mut buf = [0u8; 2];
        store.read(0, &mut buf).unwrap();
        store.read(2, &mut buf).unwrap();
        store.clear().unwrap();

        assert_eq!(store.reads(), 2);
        assert_eq!(store.clears(), 1);
    }
}
