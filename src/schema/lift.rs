//! Typed lifting of JSON documents into record instances
//!
//! JSON has no record or enum values, so a plain conversion would turn every
//! nested object into a map. Lifting walks the declared field types alongside
//! the document and builds `RecordValue`s where a record is declared, and enum
//! values where a string names a declared variant. Everything else converts
//! untyped, leaving conformance to the validator.

use serde_json::Value as JsonValue;

use super::catalog::Catalog;
use super::conformance::ConformanceChecker;
use super::errors::{SchemaError, SchemaResult, Violation};
use super::types::TypeDescriptor;
use super::value::{RecordValue, Value};

impl Catalog {
    /// Builds a record instance of type `record` from a JSON object.
    ///
    /// Keys that are not typed fields are kept as untyped values.
    ///
    /// # Errors
    ///
    /// - VALDAC_TYPE_MISMATCH on field `$root` if `json` is not an object
    /// - VALDAC_UNKNOWN_RECORD / VALDAC_UNRESOLVABLE_TYPE from resolution
    pub fn record_from_json(&self, record: &str, json: &JsonValue) -> SchemaResult<RecordValue> {
        let obj = json.as_object().ok_or_else(|| {
            SchemaError::type_mismatch(
                record,
                Violation::new("$root", record, Value::from(json).to_string()),
            )
        })?;

        let fields = self.field_descriptors(record)?;
        let mut instance = RecordValue::new(record);
        for (key, item) in obj {
            let value = match fields.iter().find(|field| field.name == *key) {
                Some(field) => self.lift(item, &field.ty)?,
                None => Value::from(item),
            };
            instance.set(key.clone(), value);
        }
        Ok(instance)
    }

    fn lift(&self, json: &JsonValue, ty: &TypeDescriptor) -> SchemaResult<Value> {
        let value = match (ty, json) {
            (_, JsonValue::Null) => Value::Null,
            (TypeDescriptor::Optional { inner }, _) => self.lift(json, inner)?,
            (TypeDescriptor::Union { members }, _) => {
                for member in members {
                    if let Some(value) = self.lift_member(json, member)? {
                        return Ok(value);
                    }
                }
                Value::from(json)
            }
            (TypeDescriptor::List { element }, JsonValue::Array(items)) => {
                Value::List(self.lift_items(items, element)?)
            }
            (TypeDescriptor::Set { element }, JsonValue::Array(items)) => {
                Value::Set(self.lift_items(items, element)?)
            }
            (TypeDescriptor::Map { key, value }, JsonValue::Object(obj)) => Value::Map(
                obj.iter()
                    .map(|(k, v)| -> SchemaResult<(Value, Value)> {
                        Ok((self.lift_key(k, key)?, self.lift(v, value)?))
                    })
                    .collect::<SchemaResult<_>>()?,
            ),
            (TypeDescriptor::Record { name }, JsonValue::Object(_)) => {
                Value::Record(self.record_from_json(name, json)?)
            }
            (TypeDescriptor::Enum { name, variants }, JsonValue::String(s))
                if variants.contains(s) =>
            {
                Value::enum_variant(name.clone(), s.clone())
            }
            _ => Value::from(json),
        };
        Ok(value)
    }

    fn lift_items(&self, items: &[JsonValue], element: &TypeDescriptor) -> SchemaResult<Vec<Value>> {
        items.iter().map(|item| self.lift(item, element)).collect()
    }

    /// Lifts a JSON object key as a map key of type `ty`.
    ///
    /// Keys are always strings in JSON; a key spelling a number or boolean
    /// becomes that scalar when it conforms to `ty`.
    fn lift_key(&self, key: &str, ty: &TypeDescriptor) -> SchemaResult<Value> {
        if *ty != TypeDescriptor::String {
            if let Ok(scalar @ (JsonValue::Number(_) | JsonValue::Bool(_))) =
                serde_json::from_str::<JsonValue>(key)
            {
                let value = self.lift(&scalar, ty)?;
                if ConformanceChecker::new().check(&value, ty) {
                    return Ok(value);
                }
            }
        }
        self.lift(&JsonValue::String(key.to_string()), ty)
    }

    /// Lifts `json` as one union member, or `None` if it would not conform.
    fn lift_member(&self, json: &JsonValue, member: &TypeDescriptor) -> SchemaResult<Option<Value>> {
        if !self.keys_fit(json, member)? {
            return Ok(None);
        }

        let value = self.lift(json, member)?;
        Ok(ConformanceChecker::new()
            .check(&value, member)
            .then_some(value))
    }

    /// Whether every object reachable in `json` at a record position has
    /// only keys declared by that record.
    fn keys_fit(&self, json: &JsonValue, ty: &TypeDescriptor) -> SchemaResult<bool> {
        match (ty, json) {
            (TypeDescriptor::Optional { inner }, _) => {
                Ok(json.is_null() || self.keys_fit(json, inner)?)
            }
            (TypeDescriptor::Union { members }, _) => {
                for member in members {
                    if self.keys_fit(json, member)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            (TypeDescriptor::List { element }, JsonValue::Array(items))
            | (TypeDescriptor::Set { element }, JsonValue::Array(items)) => {
                for item in items {
                    if !self.keys_fit(item, element)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeDescriptor::Map { value, .. }, JsonValue::Object(obj)) => {
                for item in obj.values() {
                    if !self.keys_fit(item, value)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (TypeDescriptor::Record { name }, JsonValue::Object(obj)) => {
                let def = self.record_def(name)?;
                if !obj
                    .keys()
                    .all(|key| def.fields.iter().any(|field| field.name == *key))
                {
                    return Ok(false);
                }
                let fields = self.field_descriptors(name)?;
                for (key, item) in obj {
                    if let Some(field) = fields.iter().find(|field| field.name == *key) {
                        if !self.keys_fit(item, &field.ty)? {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }
            _ => Ok(true),
        }
    }
}
