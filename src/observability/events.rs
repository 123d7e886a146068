//! Observable events
//!
//! Events are explicit and typed. Each one maps to a fixed
//! `SCREAMING_SNAKE` name used as the `event` key of a log line.

use std::fmt;

/// Observable events in valdac
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Definition files read into a catalog
    DefinitionsLoaded,
    /// Field descriptors computed and cached for a record
    RecordResolved,
    /// A field type named something the catalog does not hold
    ResolutionFailed,
    /// A record instance failed validation
    ValidationFailed,
    /// A schema document was produced
    SchemaSynthesized,
    /// A CLI command ended in an error (FATAL)
    CommandFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DefinitionsLoaded => "DEFINITIONS_LOADED",
            Event::RecordResolved => "RECORD_RESOLVED",
            Event::ResolutionFailed => "RESOLUTION_FAILED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::SchemaSynthesized => "SCHEMA_SYNTHESIZED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CommandFailed)
    }

    /// Returns true for per-record events emitted on every call
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            Event::RecordResolved | Event::ValidationFailed | Event::SchemaSynthesized
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
