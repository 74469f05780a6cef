//! Observability for the shared data area
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//!
//! Logging is read-only: a failed log write never changes the outcome of an
//! append.
//!
//! ```ignore
//! use bootshare::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::AreaInitialized, &[("capacity", "256")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
///
/// Failures go out at ERROR, rejections at WARN, appends at TRACE and the
/// rest at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = match event {
        e if e.is_failure() => Severity::Error,
        Event::DuplicateRejected | Event::OverflowRejected => Severity::Warn,
        Event::EntryAppended => Severity::Trace,
        _ => Severity::Info,
    };
    Logger::log(severity, event.as_str(), fields);
}
