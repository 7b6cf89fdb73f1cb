//! Core types for trait composition.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a trait property is inserted on an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraitLocation {
    /// Request parameters (query, header, path).
    Parameters,
    /// The `api-version` request parameter.
    ApiVersionParameter,
    /// Response headers.
    ResponseHeaders,
    /// Response body.
    ResponseBody,
}

impl TraitLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitLocation::Parameters => "parameters",
            TraitLocation::ApiVersionParameter => "apiVersionParameter",
            TraitLocation::ResponseHeaders => "responseHeaders",
            TraitLocation::ResponseBody => "responseBody",
        }
    }
}

impl fmt::Display for TraitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage scenario a trait property applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraitContext {
    Read,
    Create,
    Update,
    Delete,
    List,
    Action,
    /// Operations that declare no specific context.
    Undefined,
}

/// Ordered set of trait contexts.
///
/// An empty set used as a request means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextSet(BTreeSet<TraitContext>);

impl ContextSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersects(&self, other: &ContextSet) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }
}

impl FromIterator<TraitContext> for ContextSet {
    fn from_iter<I: IntoIterator<Item = TraitContext>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[TraitContext; N]> for ContextSet {
    fn from(contexts: [TraitContext; N]) -> Self {
        contexts.into_iter().collect()
    }
}

/// Annotation attached to a model or model property.
///
/// A property holds at most one tag of each [`AnnotationKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationTag {
    /// Property is sent as a query parameter.
    Query,
    /// Property is sent as a header.
    Header,
    /// Name of the trait this property was composed from.
    TraitSource(String),
    /// Location a trait property is destined for.
    TraitLocation(TraitLocation),
    /// Contexts a trait property is restricted to.
    TraitContext(ContextSet),
    /// Envelope installed by an explicit trait override.
    TraitOverride,
    /// Declared trait name of a trait model.
    Trait(String),
}

/// Discriminant of [`AnnotationTag`], used for set semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    Query,
    Header,
    TraitSource,
    TraitLocation,
    TraitContext,
    TraitOverride,
    Trait,
}

impl AnnotationTag {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationTag::Query => AnnotationKind::Query,
            AnnotationTag::Header => AnnotationKind::Header,
            AnnotationTag::TraitSource(_) => AnnotationKind::TraitSource,
            AnnotationTag::TraitLocation(_) => AnnotationKind::TraitLocation,
            AnnotationTag::TraitContext(_) => AnnotationKind::TraitContext,
            AnnotationTag::TraitOverride => AnnotationKind::TraitOverride,
            AnnotationTag::Trait(_) => AnnotationKind::Trait,
        }
    }
}

impl AnnotationKind {
    /// Decorator-style name used in diagnostic messages.
    pub fn decorator(&self) -> &'static str {
        match self {
            AnnotationKind::Query => "@query",
            AnnotationKind::Header => "@header",
            AnnotationKind::TraitSource => "@traitSource",
            AnnotationKind::TraitLocation => "@traitLocation",
            AnnotationKind::TraitContext => "@traitContext",
            AnnotationKind::TraitOverride => "@traitOverride",
            AnnotationKind::Trait => "@trait",
        }
    }
}

/// A trait that must be present on a composed trait model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedTrait {
    pub trait_name: String,
    pub diagnostic_message: String,
}

impl ExpectedTrait {
    pub fn new(trait_name: impl Into<String>, diagnostic_message: impl Into<String>) -> Self {
        Self {
            trait_name: trait_name.into(),
            diagnostic_message: diagnostic_message.into(),
        }
    }
}

/// What to do when two different traits contribute a property of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictPolicy {
    /// Keep the existing property and report a trait conflict.
    #[default]
    Report,
    /// Replace the existing property with the incoming one.
    LastWriteWins,
}

/// Options for selecting trait properties into a target.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Location to select properties for.
    pub location: TraitLocation,
    /// Contexts to select properties for. Empty matches every context.
    pub contexts: ContextSet,
    /// Conflict handling between different traits.
    pub on_conflict: ConflictPolicy,
}

impl SelectOptions {
    /// Create new select options that report trait conflicts (default).
    pub fn new(location: TraitLocation, contexts: impl Into<ContextSet>) -> Self {
        Self {
            location,
            contexts: contexts.into(),
            on_conflict: ConflictPolicy::Report,
        }
    }

    /// Set the conflict policy.
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }
}
