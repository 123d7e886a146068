//! Type conformance checking
//!
//! Decides whether a runtime value conforms to a type descriptor.
//! Pure and total: a non-conforming value yields `false`, never an error.
//!
//! - Primitive kinds match exactly, with no implicit coercion
//! - `bool` is never an `int`
//! - Nested records match by type name only; their own fields are the
//!   nested record's validation concern

use super::types::TypeDescriptor;
use super::value::Value;

/// Checks values against type descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConformanceChecker {
    /// Accept an `int` where a `float` is declared
    numeric_tower: bool,
}

impl ConformanceChecker {
    /// Creates a checker with exact numeric matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a checker that lets integers satisfy `float`.
    pub fn with_numeric_tower() -> Self {
        Self {
            numeric_tower: true,
        }
    }

    pub fn numeric_tower(&self) -> bool {
        self.numeric_tower
    }

    /// Returns true if `value` conforms to `expected`.
    pub fn check(&self, value: &Value, expected: &TypeDescriptor) -> bool {
        match expected {
            TypeDescriptor::Any => true,
            TypeDescriptor::String => matches!(value, Value::Str(_)),
            TypeDescriptor::Int => matches!(value, Value::Int(_)),
            TypeDescriptor::Float => match value {
                Value::Float(_) => true,
                Value::Int(_) => self.numeric_tower,
                _ => false,
            },
            TypeDescriptor::Number => matches!(value, Value::Int(_) | Value::Float(_)),
            TypeDescriptor::Bool => matches!(value, Value::Bool(_)),
            TypeDescriptor::Bytes => matches!(value, Value::Bytes(_)),
            TypeDescriptor::Optional { inner } => value.is_null() || self.check(value, inner),
            TypeDescriptor::Union { members } => {
                members.iter().any(|member| self.check(value, member))
            }
            TypeDescriptor::List { element } => match value {
                Value::List(items) => self.check_all(items, element),
                _ => false,
            },
            TypeDescriptor::Set { element } => match value {
                Value::Set(items) => self.check_all(items, element),
                _ => false,
            },
            TypeDescriptor::Map { key, value: val } => match value {
                Value::Map(entries) => entries
                    .iter()
                    .all(|(k, v)| self.check(k, key) && self.check(v, val)),
                _ => false,
            },
            TypeDescriptor::Record { name } => match value {
                Value::Record(record) => record.type_name() == name,
                _ => false,
            },
            TypeDescriptor::Enum { name, variants } => match value {
                Value::Enum { type_name, variant } => {
                    type_name == name && variants.iter().any(|v| v == variant)
                }
                _ => false,
            },
            // never resolved against a catalog
            TypeDescriptor::Ref { .. } => false,
        }
    }

    fn check_all(&self, items: &[Value], element: &TypeDescriptor) -> bool {
        items.iter().all(|item| self.check(item, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::value::RecordValue;

    fn check(value: impl Into<Value>, ty: &TypeDescriptor) -> bool {
        ConformanceChecker::new().check(&value.into(), ty)
    }

    #[test]
    fn test_primitives_match_exactly() {
        assert!(check("Al", &TypeDescriptor::String));
        assert!(!check(42i64, &TypeDescriptor::String));
        assert!(check(42i64, &TypeDescriptor::Int));
        assert!(!check(4.2, &TypeDescriptor::Int));
        assert!(check(4.2, &TypeDescriptor::Float));
        assert!(!check(true, &TypeDescriptor::Int));
        assert!(check(true, &TypeDescriptor::Bool));
        assert!(check(Value::Bytes(vec![1, 2]), &TypeDescriptor::Bytes));
        assert!(!check("ab", &TypeDescriptor::Bytes));
    }

    #[test]
    fn test_int_is_not_float_without_numeric_tower() {
        assert!(!check(1i64, &TypeDescriptor::Float));

        let tower = ConformanceChecker::with_numeric_tower();
        assert!(tower.check(&Value::Int(1), &TypeDescriptor::Float));
        // the tower only widens int to float
        assert!(!tower.check(&Value::Float(1.0), &TypeDescriptor::Int));
    }

    #[test]
    fn test_number_accepts_both() {
        assert!(check(1i64, &TypeDescriptor::Number));
        assert!(check(1.5, &TypeDescriptor::Number));
        assert!(!check("1", &TypeDescriptor::Number));
    }

    #[test]
    fn test_any_accepts_everything() {
        assert!(check(Value::Null, &TypeDescriptor::Any));
        assert!(check(vec!["a"], &TypeDescriptor::Any));
    }

    #[test]
    fn test_optional() {
        let ty = TypeDescriptor::optional(TypeDescriptor::Int);
        assert!(check(Value::Null, &ty));
        assert!(check(3i64, &ty));
        assert!(!check("3", &ty));

        // absent always conforms, whatever is wrapped
        let nested = TypeDescriptor::optional(TypeDescriptor::record("User"));
        assert!(check(Value::Null, &nested));
    }

    #[test]
    fn test_null_is_not_a_primitive() {
        assert!(!check(Value::Null, &TypeDescriptor::String));
        assert!(!check(Value::Null, &TypeDescriptor::Int));
    }

    #[test]
    fn test_union() {
        let ty = TypeDescriptor::union([TypeDescriptor::Int, TypeDescriptor::String]);
        assert!(check(1i64, &ty));
        assert!(check("one", &ty));
        assert!(!check(1.0, &ty));
        assert!(!check(Value::Null, &ty));
        assert!(!check(1i64, &TypeDescriptor::union(Vec::new())));
    }

    #[test]
    fn test_list() {
        let ty = TypeDescriptor::list(TypeDescriptor::String);
        assert!(check(Vec::<String>::new(), &ty));
        assert!(check(vec!["a", "b"], &ty));
        assert!(!check(Value::List(vec!["a".into(), Value::Int(1)]), &ty));
        assert!(!check(Value::Set(vec!["a".into()]), &ty));
        assert!(!check("a", &ty));
    }

    #[test]
    fn test_set() {
        let ty = TypeDescriptor::set(TypeDescriptor::Int);
        assert!(check(Value::Set(vec![]), &ty));
        assert!(check(Value::Set(vec![Value::Int(1)]), &ty));
        assert!(!check(Value::Set(vec![Value::Float(1.0)]), &ty));
        assert!(!check(vec![1i64], &ty));
    }

    #[test]
    fn test_map() {
        let ty = TypeDescriptor::map(TypeDescriptor::String, TypeDescriptor::Int);
        assert!(check(Value::Map(vec![]), &ty));
        assert!(check(Value::Map(vec![("a".into(), Value::Int(1))]), &ty));
        assert!(!check(Value::Map(vec![(Value::Int(1), Value::Int(1))]), &ty));
        assert!(!check(Value::Map(vec![("a".into(), "b".into())]), &ty));
    }

    #[test]
    fn test_nested_record_matches_by_name_only() {
        let ty = TypeDescriptor::record("Address");
        // field contents are not inspected
        let address = RecordValue::new("Address").with("zip", 12345i64);
        assert!(check(address, &ty));
        assert!(!check(RecordValue::new("User"), &ty));
        assert!(!check(Value::Map(vec![]), &ty));
    }

    #[test]
    fn test_enum() {
        let ty = TypeDescriptor::Enum {
            name: "Color".into(),
            variants: vec!["red".into(), "green".into()],
        };
        assert!(check(Value::enum_variant("Color", "red"), &ty));
        assert!(!check(Value::enum_variant("Color", "blue"), &ty));
        assert!(!check(Value::enum_variant("Shade", "red"), &ty));
        assert!(!check("red", &ty));
    }

    #[test]
    fn test_unresolved_ref_never_conforms() {
        assert!(!check(RecordValue::new("User"), &TypeDescriptor::reference("User")));
    }
}
