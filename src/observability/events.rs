//! Observable events of the shared data area

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Region cleared and capacity captured for this session
    AreaInitialized,
    /// Entry committed and made visible through the header
    EntryAppended,
    /// Append refused: key already present
    DuplicateRejected,
    /// Append refused: entry does not fit
    OverflowRejected,
    /// Entry header or payload write failed
    EntryWriteFailed,
    /// Area header commit failed after the entry was written
    HeaderCommitFailed,
    /// Duplicate scan could not read an entry header
    ScanReadFailed,
    /// Region clear failed; the store stays uninitialized
    ClearFailed,
    /// All boot info entries written
    BootInfoSaved,
    /// Boot info write stopped at a failing entry
    BootInfoFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::AreaInitialized => "AREA_INITIALIZED",
            Event::EntryAppended => "ENTRY_APPENDED",
            Event::DuplicateRejected => "DUPLICATE_REJECTED",
            Event::OverflowRejected => "OVERFLOW_REJECTED",
            Event::EntryWriteFailed => "ENTRY_WRITE_FAILED",
            Event::HeaderCommitFailed => "HEADER_COMMIT_FAILED",
            Event::ScanReadFailed => "SCAN_READ_FAILED",
            Event::ClearFailed => "CLEAR_FAILED",
            Event::BootInfoSaved => "BOOT_INFO_SAVED",
            Event::BootInfoFailed => "BOOT_INFO_FAILED",
        }
    }

    /// Whether this event reports a device failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::EntryWriteFailed
                | Event::HeaderCommitFailed
                | Event::ScanReadFailed
                | Event::ClearFailed
                | Event::BootInfoFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
