//! Trait document loading.
//!
//! A document declares the models, interfaces and operations of one
//! compilation unit plus the ordered elaboration steps to run over them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::elaborate::Step;
use crate::error::LoadError;
use crate::graph::{Interface, MemoryGraph, Model, Operation};

/// A compilation unit: schema declarations plus elaboration steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Document {
    /// Build the in-memory graph for this document's declarations.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Duplicate` if a name is declared twice.
    pub fn graph(&self) -> Result<MemoryGraph, LoadError> {
        let mut graph = MemoryGraph::new();
        let mut seen = std::collections::HashSet::new();

        for model in &self.models {
            if !seen.insert(("model", model.name.as_str())) {
                return Err(duplicate("model", &model.name));
            }
            graph.insert_model(model.clone());
        }
        for interface in &self.interfaces {
            if !seen.insert(("interface", interface.name.as_str())) {
                return Err(duplicate("interface", &interface.name));
            }
            graph.insert_interface(interface.clone());
        }
        for operation in &self.operations {
            if !seen.insert(("operation", operation.name.as_str())) {
                return Err(duplicate("operation", &operation.name));
            }
            graph.insert_operation(operation.clone());
        }

        Ok(graph)
    }
}

fn duplicate(kind: &'static str, name: &str) -> LoadError {
    LoadError::Duplicate {
        kind,
        name: name.to_string(),
    }
}

/// Load a document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't a valid document.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid document.
pub fn load_document_str(content: &str) -> Result<Document, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}
