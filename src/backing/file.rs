//! File-backed retained region
//!
//! The region is a fixed-size image file. Every write is followed by
//! `sync_data`, so a write that returns `Ok` is on disk. The file is never
//! resized after open.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::{check_bounds, BackingResult, BackingStore};

/// Fixed-size image file used as the shared data region.
#[derive(Debug)]
pub struct FileStore {
    /// Underlying file handle
    file: File,
    /// Region size, fixed at open
    capacity: usize,
}

impl FileStore {
    /// Creates the image file (and parent directories) if missing and sizes it
    /// to exactly `capacity` bytes.
    ///
    /// Existing content inside the new size is preserved; the first append of
    /// a session clears it anyway.
    pub fn create(path: &Path, capacity: usize) -> BackingResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        file.set_len(capacity as u64)?;
        file.sync_all()?;

        Ok(Self {
            file,
            capacity,
        })
    }

    /// Opens an existing image file. The capacity is the current file length.
    pub fn open(path: &Path) -> BackingResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let capacity = file.metadata()?.len() as usize;

        Ok(Self {
            file,
            capacity,
        })
    }
}

impl BackingStore for FileStore {
    fn clear(&mut self) -> BackingResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&vec![0u8; self.capacity])?;
        self.file.sync_data()?;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> BackingResult<()> {
        check_bounds(offset, buf.len(), self.capacity)?;
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> BackingResult<()> {
        check_bounds(offset, data.len(), self.capacity)?;
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.write_all(data)?;
        self.file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_sizes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/area.img");

        let store = FileStore::create(&path, 64).unwrap();
        assert_eq!(store.capacity(), 64);
        assert_eq!(fs::metadata(&path).unwrap().len(), 64);
    }

    #[test]
    fn test_write_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("area.img");

        {
            let mut store = FileStore::create(&path, 32).unwrap();
            store.write(8, b"retained").unwrap();
        }

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.capacity(), 32);
        let mut buf = [0u8; 8];
        store.read(8, &mut buf).unwrap();
        assert_eq!(&buf, b"retained");
    }

    #[test]
    fn test_clear_zero_fills() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("area.img");

        let mut store = FileStore::create(&path, 16).unwrap();
        store.write(0, &[0xAB; 16]).unwrap();
        store.clear().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn test_write_past_end_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("area.img");

        let mut store = FileStore::create(&path, 16).unwrap();
        assert!(store.write(15, b"xy").is_err());
        assert_eq!(fs::metadata(&path).unwrap().len(), 16);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(FileStore::open(&temp.path().join("missing.img")).is_err());
    }
}
