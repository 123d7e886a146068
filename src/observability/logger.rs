//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` and `severity` first, remaining keys in alphabetical order
//! - Synchronous, no buffering
//! - Written to stderr; stdout belongs to command output

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn from_u8(level: u8) -> Self {
        match level {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            "FATAL" => Ok(Severity::Fatal),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Lowest severity that is written
static THRESHOLD: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Sets the lowest severity that will be written, process-wide.
    pub fn set_threshold(severity: Severity) {
        THRESHOLD.store(severity as u8, Ordering::Relaxed);
    }

    pub fn threshold() -> Severity {
        Severity::from_u8(THRESHOLD.load(Ordering::Relaxed))
    }

    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::threshold()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let _ = writer.write_all(Self::format_line(severity, event, fields).as_bytes());
        let _ = writer.flush();
    }

    /// Formats one log line, newline included.
    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        // Sort fields alphabetically for deterministic output
        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        let mut output = String::with_capacity(128);
        output.push('{');
        push_pair(&mut output, "event", event);
        output.push(',');
        push_pair(&mut output, "severity", severity.as_str());
        for (key, value) in sorted_fields {
            output.push(',');
            push_pair(&mut output, key, value);
        }
        output.push_str("}\n");
        output
    }
}

/// Appends `"key":"value"` with JSON string escaping.
fn push_pair(output: &mut String, key: &str, value: &str) {
    output.push_str(&Value::String(key.to_string()).to_string());
    output.push(':');
    output.push_str(&Value::String(value.to_string()).to_string());
}

/// Capture a log line for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
