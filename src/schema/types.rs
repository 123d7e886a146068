//! Type descriptors and record definitions
//!
//! Supported types:
//! - string, int, float, bool, bytes: exact primitive kinds
//! - number: int or float
//! - any: every value
//! - optional, union, list, set, map: composites over nested descriptors
//! - record: nested record, matched by type name
//! - enum: closed set of named variants
//! - ref: by-name reference, resolved against a catalog to record or enum

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeDescriptor {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Integer or floating point
    Number,
    /// Boolean
    Bool,
    /// Raw bytes
    Bytes,
    /// Any value at all
    Any,
    /// Absent (`null`) or the wrapped type
    Optional { inner: Box<TypeDescriptor> },
    /// At least one member type
    Union { members: Vec<TypeDescriptor> },
    /// Ordered homogeneous container
    List { element: Box<TypeDescriptor> },
    /// Unordered homogeneous container
    Set { element: Box<TypeDescriptor> },
    /// Mapping from keys to values
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// Nested record of the named type
    Record { name: String },
    /// Enumeration with a closed variant set
    Enum { name: String, variants: Vec<String> },
    /// Unresolved reference to a record or enum by name
    Ref { name: String },
}

impl TypeDescriptor {
    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional {
            inner: Box::new(inner),
        }
    }

    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Union {
            members: members.into_iter().collect(),
        }
    }

    pub fn list(element: TypeDescriptor) -> Self {
        TypeDescriptor::List {
            element: Box::new(element),
        }
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set {
            element: Box::new(element),
        }
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn record(name: impl Into<String>) -> Self {
        TypeDescriptor::Record { name: name.into() }
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeDescriptor::Ref { name: name.into() }
    }

    /// Returns the primitive type name, or `None` for composite types
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            TypeDescriptor::String => Some("string"),
            TypeDescriptor::Int => Some("int"),
            TypeDescriptor::Float => Some("float"),
            TypeDescriptor::Number => Some("number"),
            TypeDescriptor::Bool => Some("bool"),
            TypeDescriptor::Bytes => Some("bytes"),
            TypeDescriptor::Any => Some("any"),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::String
            | TypeDescriptor::Int
            | TypeDescriptor::Float
            | TypeDescriptor::Number
            | TypeDescriptor::Bool
            | TypeDescriptor::Bytes
            | TypeDescriptor::Any => f.write_str(self.primitive_name().unwrap_or_default()),
            TypeDescriptor::Optional { inner } => write!(f, "optional[{}]", inner),
            TypeDescriptor::Union { members } => {
                f.write_str("union[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                f.write_str("]")
            }
            TypeDescriptor::List { element } => write!(f, "list[{}]", element),
            TypeDescriptor::Set { element } => write!(f, "set[{}]", element),
            TypeDescriptor::Map { key, value } => write!(f, "map[{}, {}]", key, value),
            TypeDescriptor::Record { name }
            | TypeDescriptor::Enum { name, .. }
            | TypeDescriptor::Ref { name } => f.write_str(name),
        }
    }
}

/// Field as declared on a record definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Declared type; `None` means the field carries no type annotation
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// Create a typed field
    pub fn typed(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            description: None,
        }
    }

    /// Create a field without a type annotation
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Static shape of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    /// Type name, unique within a catalog
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            fields,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title shown in schema documents, defaulting to the type name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Named enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Descriptor that matches values of this enum
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::Enum {
            name: self.name.clone(),
            variants: self.variants.clone(),
        }
    }
}

/// A named type definition as stored in a catalog or definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDef {
    Record(RecordDef),
    Enum(EnumDef),
}

impl TypeDef {
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Record(def) => &def.name,
            TypeDef::Enum(def) => &def.name,
        }
    }

    pub fn as_record(&self) -> Option<&RecordDef> {
        match self {
            TypeDef::Record(def) => Some(def),
            TypeDef::Enum(_) => None,
        }
    }
}

impl From<RecordDef> for TypeDef {
    fn from(def: RecordDef) -> Self {
        TypeDef::Record(def)
    }
}

impl From<EnumDef> for TypeDef {
    fn from(def: EnumDef) -> Self {
        TypeDef::Enum(def)
    }
}

/// A typed field after resolution: every reference inside `ty` names a
/// defined record or has been replaced by its enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
}
