//! Record validation
//!
//! Validation semantics:
//! - Fields are checked in declaration order
//! - Only typed fields are checked; untyped fields are skipped
//! - A field missing from the instance reads as `null`
//! - The first non-conforming field stops validation
//! - The instance is never mutated, so validation is deterministic

use super::catalog::Catalog;
use super::conformance::ConformanceChecker;
use super::errors::{SchemaError, SchemaResult, Violation};
use super::synthesizer::{SchemaDocument, SchemaSynthesizer};
use super::types::FieldDescriptor;
use super::value::{Describe, Record, Value};
use crate::observability::{log_event_with_fields, Event};

/// Validates record instances against their catalog definitions.
pub struct RecordValidator<'a> {
    catalog: &'a Catalog,
    checker: ConformanceChecker,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator with exact numeric matching.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_checker(catalog, ConformanceChecker::new())
    }

    pub fn with_checker(catalog: &'a Catalog, checker: ConformanceChecker) -> Self {
        Self { catalog, checker }
    }

    /// Validates a record instance.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - The record type is not defined (VALDAC_UNKNOWN_RECORD)
    /// - A field type cannot be resolved (VALDAC_UNRESOLVABLE_TYPE)
    /// - A field value does not conform (VALDAC_TYPE_MISMATCH), naming the
    ///   first such field
    pub fn validate(&self, record: &dyn Record) -> SchemaResult<()> {
        let fields = self.catalog.field_descriptors(record.type_name())?;

        match fields.iter().find_map(|field| self.check_field(record, field)) {
            Some(violation) => {
                log_event_with_fields(
                    Event::ValidationFailed,
                    &[("record", record.type_name()), ("field", violation.field.as_str())],
                );
                Err(SchemaError::type_mismatch(record.type_name(), violation))
            }
            None => Ok(()),
        }
    }

    /// Collects every non-conforming field instead of stopping at the first.
    ///
    /// An empty result means the record is valid. Errors are limited to
    /// unknown or unresolvable record types.
    pub fn violations(&self, record: &dyn Record) -> SchemaResult<Vec<Violation>> {
        let fields = self.catalog.field_descriptors(record.type_name())?;
        Ok(fields
            .iter()
            .filter_map(|field| self.check_field(record, field))
            .collect())
    }

    fn check_field(&self, record: &dyn Record, field: &FieldDescriptor) -> Option<Violation> {
        let value = record.field_value(&field.name).unwrap_or(Value::Null);
        if self.checker.check(&value, &field.ty) {
            None
        } else {
            Some(Violation::new(
                &field.name,
                field.ty.to_string(),
                value.to_string(),
            ))
        }
    }
}

/// Validation and schema generation for Rust record types against the
/// process-wide catalog.
///
/// The type registers itself on first use.
pub trait Validate: Record + Describe + Sized {
    /// Returns `Ok(())` if every typed field conforms to its declared type.
    fn validate(&self) -> SchemaResult<()> {
        let catalog = Catalog::global();
        Self::register(catalog)?;
        RecordValidator::new(catalog).validate(self)
    }

    /// Synthesizes the schema document for this record type.
    fn json_schema() -> SchemaResult<SchemaDocument> {
        let catalog = Catalog::global();
        Self::register(catalog)?;
        SchemaSynthesizer::new(catalog).synthesize(&Self::definition().name)
    }
}

impl<T: Record + Describe> Validate for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::types::{FieldDef, RecordDef, TypeDescriptor};
    use crate::schema::value::RecordValue;

    fn user_catalog() -> Catalog {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "User",
                vec![
                    FieldDef::typed("name", TypeDescriptor::String),
                    FieldDef::typed("age", TypeDescriptor::optional(TypeDescriptor::Int)),
                    FieldDef::typed("tags", TypeDescriptor::list(TypeDescriptor::String)),
                    FieldDef::untyped("extra"),
                ],
            ))
            .unwrap();
        catalog
    }

    fn user(name: impl Into<Value>) -> RecordValue {
        RecordValue::new("User")
            .with("name", name)
            .with("age", Value::Null)
            .with("tags", Vec::<String>::new())
    }

    #[test]
    fn test_valid_record_passes() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        assert!(validator.validate(&user("Al")).is_ok());
    }

    #[test]
    fn test_type_mismatch_names_field() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let err = validator.validate(&user(42i64)).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
        let violation = err.violation().unwrap();
        assert_eq!(violation.field, "name");
        assert_eq!(violation.expected, "string");
        assert_eq!(violation.actual, "42");
    }

    #[test]
    fn test_untyped_field_is_skipped() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let record = user("Al").with("extra", Value::Map(vec![]));
        assert!(validator.validate(&record).is_ok());
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let record = RecordValue::new("User")
            .with("name", "Al")
            .with("tags", Vec::<String>::new());
        assert!(validator.validate(&record).is_ok());

        let record = RecordValue::new("User").with("name", "Al");
        let err = validator.validate(&record).unwrap_err();
        assert_eq!(err.violation().unwrap().field, "tags");
        assert_eq!(err.violation().unwrap().actual, "null");
    }

    #[test]
    fn test_first_violation_in_declaration_order() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let record = RecordValue::new("User")
            .with("tags", 1i64)
            .with("age", "old")
            .with("name", 2i64);
        let err = validator.validate(&record).unwrap_err();
        assert_eq!(err.violation().unwrap().field, "name");
    }

    #[test]
    fn test_violations_reports_every_field() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let record = RecordValue::new("User")
            .with("name", 2i64)
            .with("age", "old")
            .with("tags", vec!["ok"]);
        let violations = validator.violations(&record).unwrap();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["name", "age"]);

        assert!(validator.violations(&user("Al")).unwrap().is_empty());
    }

    #[test]
    fn test_numeric_tower_checker() {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "Point",
                vec![FieldDef::typed("x", TypeDescriptor::Float)],
            ))
            .unwrap();
        let point = RecordValue::new("Point").with("x", 1i64);

        assert!(RecordValidator::new(&catalog).validate(&point).is_err());
        let lenient =
            RecordValidator::with_checker(&catalog, ConformanceChecker::with_numeric_tower());
        assert!(lenient.validate(&point).is_ok());
    }

    #[test]
    fn test_unknown_record_rejected() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);

        let err = validator.validate(&RecordValue::new("Ghost")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownRecord);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let catalog = user_catalog();
        let validator = RecordValidator::new(&catalog);
        let record = user(42i64);

        let first = validator.validate(&record).unwrap_err();
        for _ in 0..10 {
            let again = validator.validate(&record).unwrap_err();
            assert_eq!(again.violation(), first.violation());
        }
    }
}
