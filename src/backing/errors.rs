//! # Backing Store Errors

use std::io;

use thiserror::Error;

/// Result type for backing store operations
pub type BackingResult<T> = Result<T, BackingError>;

/// Backing store errors
#[derive(Debug, Error)]
pub enum BackingError {
    #[error("Access out of bounds: offset {offset}, length {len} (capacity: {capacity})")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Injected {0} failure")]
    Injected(&'static str),
}

impl BackingError {
    /// Whether this failure was produced by fault injection
    pub fn is_injected(&self) -> bool {
        matches!(self, BackingError::Injected(_))
    }
}

/// Rejects an access that does not lie fully inside `capacity`.
pub(crate) fn check_bounds(offset: usize, len: usize, capacity: usize) -> BackingResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(BackingError::OutOfBounds {
            offset,
            len,
            capacity,
        }),
    }
}
