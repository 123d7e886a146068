//! Runtime values and the record abstraction
//!
//! A record instance is anything that can report its type name and hand out
//! the current value of a field by name. `RecordValue` is the dynamic
//! implementation; Rust structs implement `Record` directly.

use std::fmt;

use super::catalog::Catalog;
use super::errors::{SchemaError, SchemaResult};
use super::types::{RecordDef, TypeDef};

/// A runtime value as seen by the conformance checker.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent sentinel
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs; keys may be any value
    Map(Vec<(Value, Value)>),
    Record(RecordValue),
    Enum { type_name: String, variant: String },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn enum_variant(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Value::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(bytes) => write!(f, "bytes[{}]", bytes.len()),
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::Set(items) => write_seq(f, "{", items, "}"),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Record(record) => write!(f, "{}", record),
            Value::Enum { type_name, variant } => write!(f, "{}.{}", type_name, variant),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<RecordValue> for Value {
    fn from(record: RecordValue) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Untyped conversion: objects become string-keyed maps.
///
/// Integers that do not fit in `i64` become floats, so they never conform
/// to `int`.
impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (Value::Str(k.clone()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A dynamically built record instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Sets a field, replacing any previous value under the same name
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str(")")
    }
}

/// A record instance that can be validated.
pub trait Record {
    /// Name of the record type, as defined in the catalog
    fn type_name(&self) -> &str;

    /// Current value of a field, or `None` if the instance has no such field
    fn field_value(&self, field: &str) -> Option<Value>;
}

impl Record for RecordValue {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        self.get(field).cloned()
    }
}

/// Static shape of a Rust record type.
///
/// `register` is idempotent and stops at types already defined with the
/// same shape, so self-referential and mutually referential types terminate.
pub trait Describe {
    fn definition() -> RecordDef;

    /// Registers the record types this one refers to
    fn register_nested(_catalog: &Catalog) -> SchemaResult<()> {
        Ok(())
    }

    /// # Errors
    ///
    /// Returns VALDAC_DEFINITION_CONFLICT if the name is already defined
    /// with a different shape.
    fn register(catalog: &Catalog) -> SchemaResult<()> {
        let def = TypeDef::Record(Self::definition());
        if let Some(existing) = catalog.definition(def.name()) {
            if *existing == def {
                return Ok(());
            }
            return Err(SchemaError::definition_conflict(def.name()));
        }
        catalog.define(def)?;
        Self::register_nested(catalog)
    }
}
