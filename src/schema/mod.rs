//! Record validation and schema synthesis
//!
//! Records are structured values with a fixed set of named, typed fields.
//! Their shapes live in a `Catalog`; both components below read shapes only
//! through it.
//!
//! # Components
//!
//! - `ConformanceChecker`: does a value conform to a type descriptor
//! - `RecordValidator`: checks every typed field of an instance, failing on
//!   the first non-conforming one
//! - `SchemaSynthesizer`: derives a schema document from a record's shape,
//!   without any instance
//!
//! # Principles
//!
//! - Exact type matching, no coercion
//! - Deterministic validation
//! - Record shapes are immutable once defined

mod catalog;
mod conformance;
mod errors;
mod lift;
mod loader;
mod synthesizer;
mod types;
mod validator;
mod value;

pub use catalog::Catalog;
pub use conformance::ConformanceChecker;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, Violation};
pub use loader::DefinitionLoader;
pub use synthesizer::{SchemaDocument, SchemaNode, SchemaSynthesizer};
pub use types::{EnumDef, FieldDef, FieldDescriptor, RecordDef, TypeDef, TypeDescriptor};
pub use validator::{RecordValidator, Validate};
pub use value::{Describe, Record, RecordValue, Value};
