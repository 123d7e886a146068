//! valdac - record validation and schema synthesis
//!
//! Checks structured records against their declared field types and derives
//! schema documents from record shapes.

pub mod cli;
pub mod observability;
pub mod schema;

pub use schema::{
    Catalog, ConformanceChecker, Describe, Record, RecordValidator, RecordValue, SchemaDocument,
    SchemaError, SchemaErrorCode, SchemaResult, SchemaSynthesizer, TypeDescriptor, Validate,
    Value, Violation,
};
