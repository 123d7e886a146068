//! Schema synthesis
//!
//! Derives a schema document from a record's declared shape. Instances are
//! never read. Nested records are expanded inline the first time they appear
//! in a document; every later occurrence is emitted as a named reference.
//! Recursive shapes terminate, and a record shared by many fields is expanded
//! once, so document size stays linear in the number of reachable records.
//!
//! Node shapes in JSON form:
//! - `{"primitive": name}`
//! - `{"nullable": schema}`
//! - `{"oneOf": [schemas]}`
//! - `{"items": schema}`, plus `"uniqueItems": true` for sets
//! - `{"keys": schema, "values": schema}`
//! - `{"title": name, "enum": [variants]}`
//! - `{"ref": name}`
//! - `{"title": title, "description": text, "fields": {name: schema}}`

use std::collections::HashSet;

use serde_json::{json, Map, Value as JsonValue};

use super::catalog::Catalog;
use super::errors::SchemaResult;
use super::types::TypeDescriptor;
use crate::observability::{log_event_with_fields, Event};

/// A node of a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Primitive(&'static str),
    Nullable(Box<SchemaNode>),
    OneOf(Vec<SchemaNode>),
    Items {
        items: Box<SchemaNode>,
        unique: bool,
    },
    Mapping {
        keys: Box<SchemaNode>,
        values: Box<SchemaNode>,
    },
    Enum {
        title: String,
        values: Vec<String>,
    },
    /// Reference to a record expanded earlier in the document
    Ref(String),
    Record {
        title: String,
        description: Option<String>,
        /// Fields in declaration order
        fields: Vec<(String, SchemaNode)>,
    },
}

impl SchemaNode {
    /// Renders the node as a JSON value.
    pub fn to_json(&self) -> JsonValue {
        match self {
            SchemaNode::Primitive(name) => json!({ "primitive": name }),
            SchemaNode::Nullable(inner) => json!({ "nullable": inner.to_json() }),
            SchemaNode::OneOf(alternatives) => json!({
                "oneOf": alternatives.iter().map(SchemaNode::to_json).collect::<Vec<_>>()
            }),
            SchemaNode::Items { items, unique } => {
                let mut node = Map::new();
                node.insert("items".into(), items.to_json());
                if *unique {
                    node.insert("uniqueItems".into(), JsonValue::Bool(true));
                }
                JsonValue::Object(node)
            }
            SchemaNode::Mapping { keys, values } => json!({
                "keys": keys.to_json(),
                "values": values.to_json(),
            }),
            SchemaNode::Enum { title, values } => json!({ "title": title, "enum": values }),
            SchemaNode::Ref(name) => json!({ "ref": name }),
            SchemaNode::Record {
                title,
                description,
                fields,
            } => {
                let mut node = Map::new();
                node.insert("title".into(), JsonValue::String(title.clone()));
                if let Some(description) = description {
                    node.insert("description".into(), JsonValue::String(description.clone()));
                }
                let fields: Map<String, JsonValue> = fields
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_json()))
                    .collect();
                node.insert("fields".into(), JsonValue::Object(fields));
                JsonValue::Object(node)
            }
        }
    }
}

/// Schema document for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    record: String,
    root: SchemaNode,
}

impl SchemaDocument {
    /// Name of the record type the document describes
    pub fn record(&self) -> &str {
        &self.record
    }

    pub fn to_json(&self) -> JsonValue {
        self.root.to_json()
    }
}

/// Builds schema documents from catalog definitions.
pub struct SchemaSynthesizer<'a> {
    catalog: &'a Catalog,
}

impl<'a> SchemaSynthesizer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Synthesizes the schema document for a record type.
    ///
    /// # Errors
    ///
    /// - VALDAC_UNKNOWN_RECORD if `record` is not a defined record type
    /// - VALDAC_UNRESOLVABLE_TYPE if any reachable field refers to an
    ///   undefined type
    pub fn synthesize(&self, record: &str) -> SchemaResult<SchemaDocument> {
        let mut expanded = HashSet::new();
        let root = self.record_node(record, &mut expanded)?;

        log_event_with_fields(Event::SchemaSynthesized, &[("record", record)]);
        Ok(SchemaDocument {
            record: record.to_string(),
            root,
        })
    }

    /// `expanded` holds every record already emitted in full, or in
    /// progress, anywhere in the document.
    fn record_node(
        &self,
        record: &str,
        expanded: &mut HashSet<String>,
    ) -> SchemaResult<SchemaNode> {
        if expanded.contains(record) {
            return Ok(SchemaNode::Ref(record.to_string()));
        }

        let def = self.catalog.record_def(record)?;
        let descriptors = self.catalog.field_descriptors(record)?;

        expanded.insert(record.to_string());
        let mut fields = Vec::with_capacity(descriptors.len());
        for field in descriptors.iter() {
            let node = self.type_node(&field.ty, expanded)?;
            fields.push((field.name.clone(), node));
        }

        Ok(SchemaNode::Record {
            title: def.display_title().to_string(),
            description: def.description.clone(),
            fields,
        })
    }

    fn type_node(
        &self,
        ty: &TypeDescriptor,
        expanded: &mut HashSet<String>,
    ) -> SchemaResult<SchemaNode> {
        let node = match ty {
            TypeDescriptor::Optional { inner } => {
                SchemaNode::Nullable(Box::new(self.type_node(inner, expanded)?))
            }
            TypeDescriptor::Union { members } => SchemaNode::OneOf(
                members
                    .iter()
                    .map(|member| self.type_node(member, expanded))
                    .collect::<SchemaResult<_>>()?,
            ),
            TypeDescriptor::List { element } => SchemaNode::Items {
                items: Box::new(self.type_node(element, expanded)?),
                unique: false,
            },
            TypeDescriptor::Set { element } => SchemaNode::Items {
                items: Box::new(self.type_node(element, expanded)?),
                unique: true,
            },
            TypeDescriptor::Map { key, value } => SchemaNode::Mapping {
                keys: Box::new(self.type_node(key, expanded)?),
                values: Box::new(self.type_node(value, expanded)?),
            },
            TypeDescriptor::Enum { name, variants } => SchemaNode::Enum {
                title: name.clone(),
                values: variants.clone(),
            },
            // field descriptors from the catalog carry no unresolved refs
            TypeDescriptor::Record { name } | TypeDescriptor::Ref { name } => {
                self.record_node(name, expanded)?
            }
            primitive => SchemaNode::Primitive(primitive.primitive_name().unwrap_or("any")),
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::types::{EnumDef, FieldDef, RecordDef};

    fn user_def() -> RecordDef {
        RecordDef::new(
            "User",
            vec![
                FieldDef::typed("name", TypeDescriptor::String),
                FieldDef::typed("age", TypeDescriptor::optional(TypeDescriptor::Int)),
                FieldDef::typed("tags", TypeDescriptor::list(TypeDescriptor::String)),
            ],
        )
    }

    #[test]
    fn test_user_schema() {
        let catalog = Catalog::new();
        catalog.define(user_def()).unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("User").unwrap();
        assert_eq!(
            doc.to_json(),
            json!({
                "title": "User",
                "fields": {
                    "name": {"primitive": "string"},
                    "age": {"nullable": {"primitive": "int"}},
                    "tags": {"items": {"primitive": "string"}}
                }
            })
        );
        assert_eq!(doc.record(), "User");
    }

    #[test]
    fn test_composite_nodes() {
        let catalog = Catalog::new();
        catalog.define(EnumDef::new("Color", ["red", "green"])).unwrap();
        catalog
            .define(
                RecordDef::new(
                    "Shape",
                    vec![
                        FieldDef::typed(
                            "size",
                            TypeDescriptor::union([TypeDescriptor::Int, TypeDescriptor::Float]),
                        ),
                        FieldDef::typed("ids", TypeDescriptor::set(TypeDescriptor::Int)),
                        FieldDef::typed(
                            "labels",
                            TypeDescriptor::map(TypeDescriptor::String, TypeDescriptor::Any),
                        ),
                        FieldDef::typed("color", TypeDescriptor::reference("Color")),
                        FieldDef::untyped("scratch"),
                    ],
                )
                .with_title("A shape")
                .with_description("Drawable shape"),
            )
            .unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("Shape").unwrap();
        assert_eq!(
            doc.to_json(),
            json!({
                "title": "A shape",
                "description": "Drawable shape",
                "fields": {
                    "size": {"oneOf": [{"primitive": "int"}, {"primitive": "float"}]},
                    "ids": {"items": {"primitive": "int"}, "uniqueItems": true},
                    "labels": {"keys": {"primitive": "string"}, "values": {"primitive": "any"}},
                    "color": {"title": "Color", "enum": ["red", "green"]}
                }
            })
        );
    }

    #[test]
    fn test_repeated_record_expanded_once() {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "Address",
                vec![FieldDef::typed("city", TypeDescriptor::String)],
            ))
            .unwrap();
        catalog
            .define(RecordDef::new(
                "Person",
                vec![
                    FieldDef::typed("home", TypeDescriptor::reference("Address")),
                    FieldDef::typed(
                        "work",
                        TypeDescriptor::optional(TypeDescriptor::record("Address")),
                    ),
                ],
            ))
            .unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("Person").unwrap();
        assert_eq!(
            doc.to_json()["fields"]["home"],
            json!({"title": "Address", "fields": {"city": {"primitive": "string"}}})
        );
        assert_eq!(
            doc.to_json()["fields"]["work"],
            json!({"nullable": {"ref": "Address"}})
        );
    }

    #[test]
    fn test_shared_records_stay_linear() {
        // Level{n} has two fields, both pointing at Level{n+1}
        let depth = 40;
        let catalog = Catalog::new();
        for level in 0..depth {
            let next = TypeDescriptor::reference(format!("Level{}", level + 1));
            catalog
                .define(RecordDef::new(
                    format!("Level{}", level),
                    vec![
                        FieldDef::typed("left", next.clone()),
                        FieldDef::typed("right", next),
                    ],
                ))
                .unwrap();
        }
        catalog
            .define(RecordDef::new(
                format!("Level{}", depth),
                vec![FieldDef::typed("leaf", TypeDescriptor::Int)],
            ))
            .unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("Level0").unwrap();
        let rendered = doc.to_json().to_string();
        assert_eq!(rendered.matches("\"ref\"").count(), depth);
        assert_eq!(rendered.matches("\"title\"").count(), depth + 1);
        assert_eq!(
            doc.to_json()["fields"]["right"],
            json!({"ref": "Level1"})
        );
    }

    #[test]
    fn test_self_reference_emits_ref() {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "Node",
                vec![
                    FieldDef::typed("value", TypeDescriptor::Int),
                    FieldDef::typed("children", TypeDescriptor::list(TypeDescriptor::reference("Node"))),
                ],
            ))
            .unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("Node").unwrap();
        assert_eq!(
            doc.to_json()["fields"]["children"],
            json!({"items": {"ref": "Node"}})
        );
    }

    #[test]
    fn test_mutual_reference_emits_ref() {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "Author",
                vec![FieldDef::typed("books", TypeDescriptor::list(TypeDescriptor::reference("Book")))],
            ))
            .unwrap();
        catalog
            .define(RecordDef::new(
                "Book",
                vec![FieldDef::typed("author", TypeDescriptor::reference("Author"))],
            ))
            .unwrap();

        let doc = SchemaSynthesizer::new(&catalog).synthesize("Author").unwrap();
        assert_eq!(
            doc.to_json()["fields"]["books"]["items"],
            json!({"title": "Book", "fields": {"author": {"ref": "Author"}}})
        );
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let catalog = Catalog::new();
        catalog.define(user_def()).unwrap();
        let synthesizer = SchemaSynthesizer::new(&catalog);

        assert_eq!(
            synthesizer.synthesize("User").unwrap(),
            synthesizer.synthesize("User").unwrap()
        );
    }

    #[test]
    fn test_unresolvable_nested_type() {
        let catalog = Catalog::new();
        catalog
            .define(RecordDef::new(
                "Order",
                vec![FieldDef::typed("buyer", TypeDescriptor::reference("Customer"))],
            ))
            .unwrap();

        let err = SchemaSynthesizer::new(&catalog).synthesize("Order").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnresolvableType);
    }
}
