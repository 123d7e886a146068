//! Catalog of record and enum definitions
//!
//! The catalog is the introspection source for validation and schema
//! synthesis: it maps a type name to its declared shape, and caches the
//! resolved Field Descriptor sequence of every record on first use.
//!
//! - Definitions are immutable once registered
//! - Resolved sequences are computed at most once per shape and never
//!   invalidated
//! - Resolution failures are not cached; defining the missing type later
//!   makes the record usable

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, RecordDef, TypeDef, TypeDescriptor};
use crate::observability::{log_event_with_fields, Event};

/// Process-wide catalog, created on first use
static GLOBAL: OnceLock<Catalog> = OnceLock::new();

/// Registry of type definitions plus the resolved field cache.
#[derive(Debug, Default)]
pub struct Catalog {
    definitions: RwLock<HashMap<String, Arc<TypeDef>>>,
    resolved: RwLock<HashMap<String, Arc<[FieldDescriptor]>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide catalog.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(Catalog::new)
    }

    /// Registers a definition.
    ///
    /// Registering an identical definition again is a no-op, so concurrent
    /// registration of the same type converges.
    ///
    /// # Errors
    ///
    /// Returns VALDAC_DEFINITION_CONFLICT if the name is already defined
    /// with a different shape.
    pub fn define(&self, def: impl Into<TypeDef>) -> SchemaResult<()> {
        let def = def.into();
        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = definitions.get(def.name()) {
            if **existing == def {
                return Ok(());
            }
            return Err(SchemaError::definition_conflict(def.name()));
        }

        definitions.insert(def.name().to_string(), Arc::new(def));
        Ok(())
    }

    /// Checks if a type with this name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Gets a definition by name.
    pub fn definition(&self, name: &str) -> Option<Arc<TypeDef>> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Gets a record definition by name.
    pub fn record_def(&self, name: &str) -> SchemaResult<RecordDef> {
        self.definition(name)
            .and_then(|def| def.as_record().cloned())
            .ok_or_else(|| SchemaError::unknown_record(name))
    }

    /// Names of all defined record types, sorted.
    pub fn record_names(&self) -> Vec<String> {
        let definitions = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = definitions
            .values()
            .filter_map(|def| def.as_record().map(|r| r.name.clone()))
            .collect();
        names.sort();
        names
    }

    /// Returns the number of defined types.
    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the resolved, typed fields of a record in declaration order.
    ///
    /// Untyped fields are left out. The first successful resolution is
    /// cached; racing callers all receive the instance that was stored first.
    ///
    /// # Errors
    ///
    /// - VALDAC_UNKNOWN_RECORD if `record` is not a defined record type
    /// - VALDAC_UNRESOLVABLE_TYPE if a field refers to an undefined type
    pub fn field_descriptors(&self, record: &str) -> SchemaResult<Arc<[FieldDescriptor]>> {
        if let Some(hit) = self
            .resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(record)
        {
            return Ok(Arc::clone(hit));
        }

        let computed: Arc<[FieldDescriptor]> = self.resolve_record(record)?.into();

        let stored = {
            let mut resolved = self
                .resolved
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(resolved.entry(record.to_string()).or_insert(computed))
        };

        let field_count = stored.len().to_string();
        log_event_with_fields(
            Event::RecordResolved,
            &[("record", record), ("fields", field_count.as_str())],
        );
        Ok(stored)
    }

    /// Resolves every defined record, surfacing unresolvable types up front.
    ///
    /// Returns the sorted names of the resolved records.
    pub fn check_all(&self) -> SchemaResult<Vec<String>> {
        let names = self.record_names();
        for name in &names {
            self.field_descriptors(name)?;
        }
        Ok(names)
    }

    fn resolve_record(&self, record: &str) -> SchemaResult<Vec<FieldDescriptor>> {
        let definitions = self
            .definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let def = definitions
            .get(record)
            .and_then(|def| def.as_record())
            .ok_or_else(|| SchemaError::unknown_record(record))?;

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let Some(ty) = &field.ty else {
                continue;
            };
            let ty = resolve_type(ty, &definitions).map_err(|missing| {
                log_event_with_fields(
                    Event::ResolutionFailed,
                    &[("record", record), ("field", field.name.as_str()), ("missing", missing.as_str())],
                );
                SchemaError::unresolvable_type(record, &field.name, missing)
            })?;
            fields.push(FieldDescriptor {
                name: field.name.clone(),
                ty,
            });
        }
        Ok(fields)
    }
}

/// Replaces references with their targets.
///
/// Returns the first name that is not defined (or names the wrong kind).
fn resolve_type(
    ty: &TypeDescriptor,
    definitions: &HashMap<String, Arc<TypeDef>>,
) -> Result<TypeDescriptor, String> {
    let resolved = match ty {
        TypeDescriptor::Optional { inner } => {
            TypeDescriptor::optional(resolve_type(inner, definitions)?)
        }
        TypeDescriptor::Union { members } => TypeDescriptor::Union {
            members: members
                .iter()
                .map(|member| resolve_type(member, definitions))
                .collect::<Result<_, _>>()?,
        },
        TypeDescriptor::List { element } => {
            TypeDescriptor::list(resolve_type(element, definitions)?)
        }
        TypeDescriptor::Set { element } => TypeDescriptor::set(resolve_type(element, definitions)?),
        TypeDescriptor::Map { key, value } => TypeDescriptor::map(
            resolve_type(key, definitions)?,
            resolve_type(value, definitions)?,
        ),
        TypeDescriptor::Record { name } => match definitions.get(name).map(|def| &**def) {
            Some(TypeDef::Record(_)) => ty.clone(),
            _ => return Err(name.clone()),
        },
        TypeDescriptor::Ref { name } => match definitions.get(name).map(|def| &**def) {
            Some(TypeDef::Record(_)) => TypeDescriptor::record(name.clone()),
            Some(TypeDef::Enum(def)) => def.descriptor(),
            None => return Err(name.clone()),
        },
        other => other.clone(),
    };
    Ok(resolved)
}
