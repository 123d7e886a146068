//! Schema error types
//!
//! Error codes:
//! - VALDAC_TYPE_MISMATCH (REJECT)
//! - VALDAC_UNKNOWN_RECORD (REJECT)
//! - VALDAC_DEFINITION_CONFLICT (REJECT)
//! - VALDAC_UNRESOLVABLE_TYPE (FATAL)
//! - VALDAC_MALFORMED_DEFINITION (FATAL)

use std::fmt;

use serde::Serialize;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller decides what to do with the failure
    Reject,
    /// A defect in the record definitions themselves
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// A field value does not conform to its declared type
    TypeMismatch,
    /// A declared type names a record or enum that is not defined
    UnresolvableType,
    /// Record type not defined in the catalog
    UnknownRecord,
    /// Attempt to redefine an existing type with a different shape
    DefinitionConflict,
    /// Definition file could not be read or parsed
    MalformedDefinition,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::TypeMismatch => "VALDAC_TYPE_MISMATCH",
            SchemaErrorCode::UnresolvableType => "VALDAC_UNRESOLVABLE_TYPE",
            SchemaErrorCode::UnknownRecord => "VALDAC_UNKNOWN_RECORD",
            SchemaErrorCode::DefinitionConflict => "VALDAC_DEFINITION_CONFLICT",
            SchemaErrorCode::MalformedDefinition => "VALDAC_MALFORMED_DEFINITION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::UnresolvableType | SchemaErrorCode::MalformedDefinition => {
                Severity::Fatal
            }
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single type-conformance failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Name of the offending field
    pub field: String,
    /// Diagnostic form of the declared type
    pub expected: String,
    /// Diagnostic form of the runtime value
    pub actual: String,
}

impl Violation {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' with value '{}' does not match the expected type '{}'",
            self.field, self.actual, self.expected
        )
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Record type the error is about, if any
    record: Option<String>,
    violation: Option<Violation>,
}

impl SchemaError {
    /// Create a type mismatch error for a record field
    pub fn type_mismatch(record: impl Into<String>, violation: Violation) -> Self {
        let record = record.into();
        Self {
            code: SchemaErrorCode::TypeMismatch,
            message: format!("Record '{}': {}", record, violation),
            record: Some(record),
            violation: Some(violation),
        }
    }

    /// Create an unresolvable type error
    pub fn unresolvable_type(
        record: impl Into<String>,
        field: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        let record = record.into();
        Self {
            code: SchemaErrorCode::UnresolvableType,
            message: format!(
                "Record '{}' field '{}' refers to undefined type '{}'",
                record,
                field.into(),
                missing.into()
            ),
            record: Some(record),
            violation: None,
        }
    }

    /// Create an unknown record error
    pub fn unknown_record(record: impl Into<String>) -> Self {
        let record = record.into();
        Self {
            code: SchemaErrorCode::UnknownRecord,
            message: format!("Record type '{}' is not defined", record),
            record: Some(record),
            violation: None,
        }
    }

    /// Create a definition conflict error
    pub fn definition_conflict(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::DefinitionConflict,
            message: format!("Type '{}' is already defined with a different shape", name),
            record: Some(name),
            violation: None,
        }
    }

    /// Create an error for a malformed definition file
    pub fn malformed_definition(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedDefinition,
            message: format!(
                "Malformed definition file '{}': {}",
                path.into(),
                reason.into()
            ),
            record: None,
            violation: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the record type name if applicable
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Returns the violation for type mismatches
    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::TypeMismatch.code(), "VALDAC_TYPE_MISMATCH");
        assert_eq!(
            SchemaErrorCode::UnresolvableType.code(),
            "VALDAC_UNRESOLVABLE_TYPE"
        );
        assert_eq!(SchemaErrorCode::UnknownRecord.code(), "VALDAC_UNKNOWN_RECORD");
        assert_eq!(
            SchemaErrorCode::DefinitionConflict.code(),
            "VALDAC_DEFINITION_CONFLICT"
        );
        assert_eq!(
            SchemaErrorCode::MalformedDefinition.code(),
            "VALDAC_MALFORMED_DEFINITION"
        );
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::TypeMismatch.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::UnknownRecord.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::UnresolvableType.severity(), Severity::Fatal);
        assert!(SchemaError::unresolvable_type("User", "friend", "Friend").is_fatal());
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::new("name", "string", "42");
        let display = format!("{}", violation);
        assert!(display.contains("'name'"));
        assert!(display.contains("'42'"));
        assert!(display.contains("'string'"));
    }

    #[test]
    fn test_type_mismatch_carries_violation() {
        let err = SchemaError::type_mismatch("User", Violation::new("age", "int", "\"x\""));
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
        assert_eq!(err.record(), Some("User"));
        assert_eq!(err.violation().unwrap().field, "age");
        assert!(format!("{}", err).starts_with("[REJECT] VALDAC_TYPE_MISMATCH"));
    }
}
