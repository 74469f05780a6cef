//! Shared data error types
//!
//! Every failed append maps to exactly one code. The numeric status values
//! are the ones the next boot stage expects from the producer:
//! - SHARED_MEMORY_OVERFLOW (1)
//! - SHARED_MEMORY_OVERWRITE (2)
//! - SHARED_MEMORY_GEN_ERROR (3)
//! - SHARED_MEMORY_WRITE_ERROR (4)
//! - SHARED_MEMORY_READ_ERROR (5)
//!
//! SHARED_MEMORY_CORRUPTION is raised only by the reader, for an area whose
//! header or entry bounds cannot be trusted. It reports status 5.

use std::fmt;

use crate::backing::BackingError;

/// Status of a successful append
pub const SHARED_MEMORY_OK: i32 = 0;

/// Shared data error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedDataErrorCode {
    /// Entry does not fit in the remaining capacity
    Overflow,
    /// An entry with the same key already exists
    Overwrite,
    /// Invalid input or 16-bit length accounting overflow
    GenericError,
    /// A write sub-step failed
    WriteError,
    /// A read of an existing entry header failed
    ReadError,
    /// Area header or entry bounds are invalid
    Corruption,
}

impl SharedDataErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SharedDataErrorCode::Overflow => "SHARED_MEMORY_OVERFLOW",
            SharedDataErrorCode::Overwrite => "SHARED_MEMORY_OVERWRITE",
            SharedDataErrorCode::GenericError => "SHARED_MEMORY_GEN_ERROR",
            SharedDataErrorCode::WriteError => "SHARED_MEMORY_WRITE_ERROR",
            SharedDataErrorCode::ReadError => "SHARED_MEMORY_READ_ERROR",
            SharedDataErrorCode::Corruption => "SHARED_MEMORY_CORRUPTION",
        }
    }

    /// Returns the numeric status handed to callers
    pub fn status(&self) -> i32 {
        match self {
            SharedDataErrorCode::Overflow => 1,
            SharedDataErrorCode::Overwrite => 2,
            SharedDataErrorCode::GenericError => 3,
            SharedDataErrorCode::WriteError => 4,
            SharedDataErrorCode::ReadError => 5,
            SharedDataErrorCode::Corruption => 5,
        }
    }
}

impl fmt::Display for SharedDataErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Shared data error with context
#[derive(Debug)]
pub struct SharedDataError {
    /// Error code
    code: SharedDataErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying backing store error if applicable
    source: Option<BackingError>,
}

impl SharedDataError {
    fn new(code: SharedDataErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Invalid input detected before any I/O
    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(SharedDataErrorCode::GenericError, message)
    }

    /// Key already present in the area
    pub fn overwrite(key: impl fmt::Display) -> Self {
        Self::new(
            SharedDataErrorCode::Overwrite,
            format!("Entry {} already present", key),
        )
    }

    /// Entry would end past the region capacity
    pub fn overflow(required: usize, capacity: usize) -> Self {
        let mut err = Self::new(
            SharedDataErrorCode::Overflow,
            "Entry does not fit in shared area",
        );
        err.details = Some(format!("required: {}, capacity: {}", required, capacity));
        err
    }

    /// Backing store read failed
    pub fn read_failed(message: impl Into<String>, source: BackingError) -> Self {
        let mut err = Self::new(SharedDataErrorCode::ReadError, message);
        err.source = Some(source);
        err
    }

    /// Backing store write failed
    pub fn write_failed(message: impl Into<String>, source: BackingError) -> Self {
        let mut err = Self::new(SharedDataErrorCode::WriteError, message);
        err.source = Some(source);
        err
    }

    /// Area content cannot be trusted
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::new(SharedDataErrorCode::Corruption, message)
    }

    /// Corruption with byte offset context
    pub fn corruption_at_offset(offset: usize, reason: impl Into<String>) -> Self {
        let mut err = Self::corruption(reason);
        err.details = Some(format!("byte_offset: {}", offset));
        err
    }

    /// Returns the error code
    pub fn code(&self) -> SharedDataErrorCode {
        self.code
    }

    /// Returns the numeric status
    pub fn status(&self) -> i32 {
        self.code.status()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for SharedDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for SharedDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for shared data operations
pub type SharedDataResult<T> = Result<T, SharedDataError>;

/// Collapse a result into the numeric status handed across the boot boundary.
pub fn status_of<T>(result: &SharedDataResult<T>) -> i32 {
    match result {
        Ok(_) => SHARED_MEMORY_OK,
        Err(e) => e.status(),
    }
}
