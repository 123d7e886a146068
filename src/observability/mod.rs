//! Observability for valdac
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use valdac::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordResolved, &[("record", "User")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event == Event::ResolutionFailed {
        Severity::Warn
    } else if event.is_per_record() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
