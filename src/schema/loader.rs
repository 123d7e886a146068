//! Loading record definitions from disk
//!
//! - Every `*.json` file in the definitions directory is read, in file name
//!   order
//! - A file holds one definition or an array of definitions
//! - Unreadable or malformed files are fatal

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::catalog::Catalog;
use super::errors::{SchemaError, SchemaResult};
use super::types::TypeDef;
use crate::observability::{log_event_with_fields, Event};

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Many(Vec<TypeDef>),
    One(TypeDef),
}

/// Reads definition files into a catalog.
pub struct DefinitionLoader {
    definitions_dir: PathBuf,
}

impl DefinitionLoader {
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Self {
        Self {
            definitions_dir: definitions_dir.into(),
        }
    }

    /// Loads every definition file into `catalog`.
    ///
    /// A missing directory loads nothing. Returns the number of definitions
    /// registered.
    pub fn load_into(&self, catalog: &Catalog) -> SchemaResult<usize> {
        if !self.definitions_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.definitions_dir).map_err(|e| {
            SchemaError::malformed_definition(
                self.definitions_dir.display().to_string(),
                format!("Failed to read definitions directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_definition(
                    self.definitions_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut count = 0;
        for path in &paths {
            count += self.load_file(path, catalog)?;
        }

        let loaded = count.to_string();
        let dir = self.definitions_dir.display().to_string();
        log_event_with_fields(
            Event::DefinitionsLoaded,
            &[("count", loaded.as_str()), ("dir", dir.as_str())],
        );
        Ok(count)
    }

    fn load_file(&self, path: &Path, catalog: &Catalog) -> SchemaResult<usize> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_definition(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let file: DefinitionFile = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_definition(
                path.display().to_string(),
                format!("Invalid definition JSON: {}", e),
            )
        })?;

        let defs = match file {
            DefinitionFile::Many(defs) => defs,
            DefinitionFile::One(def) => vec![def],
        };

        let count = defs.len();
        for def in defs {
            catalog.define(def)?;
        }
        Ok(count)
    }
}
