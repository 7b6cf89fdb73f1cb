//! Schema graph adapter.
//!
//! The engine never owns schema nodes. It reads and edits them through the
//! [`SchemaGraph`] capability, which a host compiler implements over its own
//! type graph. [`MemoryGraph`] is the in-memory implementation used by the
//! document elaborator and the tests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use crate::types::{AnnotationKind, AnnotationTag};

/// Type of a model property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    /// Built-in scalar such as `string` or `int32`.
    Scalar(String),
    /// Reference to a model by name.
    Model(String),
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeRef::Scalar(name.into())
    }

    pub fn model(name: impl Into<String>) -> Self {
        TypeRef::Model(name.into())
    }

    /// Name of the referenced model, if this is a model reference.
    pub fn as_model(&self) -> Option<&str> {
        match self {
            TypeRef::Model(name) => Some(name),
            TypeRef::Scalar(_) => None,
        }
    }
}

/// A named, typed property of a [`Model`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationTag>,
}

impl ModelProperty {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            annotations: Vec::new(),
        }
    }

    /// Mark the property optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Attach an annotation, replacing any tag of the same kind.
    pub fn with(mut self, tag: AnnotationTag) -> Self {
        self.set_annotation(tag);
        self
    }

    pub fn annotations(&self) -> &[AnnotationTag] {
        &self.annotations
    }

    pub fn annotation(&self, kind: AnnotationKind) -> Option<&AnnotationTag> {
        self.annotations.iter().find(|tag| tag.kind() == kind)
    }

    pub fn has_annotation(&self, kind: AnnotationKind) -> bool {
        self.annotation(kind).is_some()
    }

    /// Set an annotation. Last write wins for each kind.
    pub fn set_annotation(&mut self, tag: AnnotationTag) {
        match self.annotations.iter_mut().find(|t| t.kind() == tag.kind()) {
            Some(slot) => *slot = tag,
            None => self.annotations.push(tag),
        }
    }
}

/// A named, ordered collection of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<ModelProperty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationTag>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Append a property (builder form).
    pub fn property(mut self, property: ModelProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Attach a model-level annotation (builder form).
    pub fn with(mut self, tag: AnnotationTag) -> Self {
        match self.annotations.iter_mut().find(|t| t.kind() == tag.kind()) {
            Some(slot) => *slot = tag,
            None => self.annotations.push(tag),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn annotation(&self, kind: AnnotationKind) -> Option<&AnnotationTag> {
        self.annotations.iter().find(|tag| tag.kind() == kind)
    }
}

/// A group of operations, checked as a whole by presence checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
}

/// A single API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    /// Model holding the operation's composed traits, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<String>,
}

/// The schema entity a diagnostic or presence check is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    Model(String),
    Property { model: String, property: String },
    Interface(String),
    Operation(String),
}

impl Target {
    pub fn model(name: impl Into<String>) -> Self {
        Target::Model(name.into())
    }

    pub fn property(model: impl Into<String>, property: impl Into<String>) -> Self {
        Target::Property {
            model: model.into(),
            property: property.into(),
        }
    }

    /// Name of the entity (the property name for properties).
    pub fn name(&self) -> &str {
        match self {
            Target::Model(name) | Target::Interface(name) | Target::Operation(name) => name,
            Target::Property { property, .. } => property,
        }
    }

    /// Kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Model(_) => "model",
            Target::Property { .. } => "property",
            Target::Interface(_) => "interface",
            Target::Operation(_) => "operation",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Model(name) | Target::Interface(name) | Target::Operation(name) => {
                write!(f, "{} {}", self.kind(), name)
            }
            Target::Property { model, property } => write!(f, "property {}.{}", model, property),
        }
    }
}

/// Capability the engine needs from the host schema graph.
///
/// All edits go through this trait so the engine can be driven by any host
/// that can expose models as ordered property lists.
pub trait SchemaGraph {
    /// Look up a model by name.
    fn model(&self, name: &str) -> Option<&Model>;

    /// Whether the graph contains the given entity.
    fn contains(&self, target: &Target) -> bool;

    /// Append a property to a model.
    ///
    /// Callers check for name collisions first; the graph does not.
    fn add_property(&mut self, model: &str, property: ModelProperty) -> Result<(), TraitError>;

    /// Remove a property by name, returning it if it existed.
    fn remove_property(
        &mut self,
        model: &str,
        property: &str,
    ) -> Result<Option<ModelProperty>, TraitError>;

    /// Set an annotation on a property, replacing any tag of the same kind.
    fn annotate(&mut self, model: &str, property: &str, tag: AnnotationTag)
        -> Result<(), TraitError>;

    /// Model holding an operation's composed traits, if it declares one.
    fn operation_traits(&self, operation: &str) -> Option<&str>;

    /// Properties of a model in declaration order.
    fn properties(&self, model: &str) -> Result<&[ModelProperty], TraitError> {
        self.model(model)
            .map(|m| m.properties.as_slice())
            .ok_or_else(|| TraitError::UnknownModel {
                name: model.to_string(),
            })
    }

    /// Look up a model or fail with [`TraitError::UnknownModel`].
    fn require_model(&self, name: &str) -> Result<&Model, TraitError> {
        self.model(name).ok_or_else(|| TraitError::UnknownModel {
            name: name.to_string(),
        })
    }
}

/// In-memory schema graph for one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    models: BTreeMap<String, Model>,
    interfaces: BTreeMap<String, Interface>,
    operations: BTreeMap<String, Operation>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a model.
    pub fn insert_model(&mut self, model: Model) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn insert_interface(&mut self, interface: Interface) {
        self.interfaces.insert(interface.name.clone(), interface);
    }

    pub fn insert_operation(&mut self, operation: Operation) {
        self.operations.insert(operation.name.clone(), operation);
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    fn model_mut(&mut self, name: &str) -> Result<&mut Model, TraitError> {
        self.models
            .get_mut(name)
            .ok_or_else(|| TraitError::UnknownModel {
                name: name.to_string(),
            })
    }
}

impl SchemaGraph for MemoryGraph {
    fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    fn contains(&self, target: &Target) -> bool {
        match target {
            Target::Model(name) => self.models.contains_key(name),
            Target::Property { model, property } => self
                .models
                .get(model)
                .map(|m| m.get(property).is_some())
                .unwrap_or(false),
            Target::Interface(name) => self.interfaces.contains_key(name),
            Target::Operation(name) => self.operations.contains_key(name),
        }
    }

    fn operation_traits(&self, operation: &str) -> Option<&str> {
        self.operation(operation)?.traits.as_deref()
    }

    fn add_property(&mut self, model: &str, property: ModelProperty) -> Result<(), TraitError> {
        self.model_mut(model)?.properties.push(property);
        Ok(())
    }

    fn remove_property(
        &mut self,
        model: &str,
        property: &str,
    ) -> Result<Option<ModelProperty>, TraitError> {
        let model = self.model_mut(model)?;
        Ok(model
            .properties
            .iter()
            .position(|p| p.name == property)
            .map(|idx| model.properties.remove(idx)))
    }

    fn annotate(
        &mut self,
        model: &str,
        property: &str,
        tag: AnnotationTag,
    ) -> Result<(), TraitError> {
        let owner = self.model_mut(model)?;
        let prop = owner
            .properties
            .iter_mut()
            .find(|p| p.name == property)
            .ok_or_else(|| TraitError::UnknownProperty {
                model: model.to_string(),
                property: property.to_string(),
            })?;
        prop.set_annotation(tag);
        Ok(())
    }
}
