//! Trait provenance.
//!
//! Every property composed from a trait carries a `TraitSource` annotation
//! naming that trait. This module writes and reads that record, and builds
//! the keyed view (trait name -> contributing properties) the override
//! resolver and presence validator work from.

use std::collections::BTreeMap;

use crate::error::TraitError;
use crate::graph::{Model, ModelProperty, SchemaGraph};
use crate::types::{AnnotationKind, AnnotationTag};

/// Record the trait a property originates from. Last write wins.
pub fn record_trait_source<G: SchemaGraph + ?Sized>(
    graph: &mut G,
    model: &str,
    property: &str,
    trait_name: &str,
) -> Result<(), TraitError> {
    graph.annotate(
        model,
        property,
        AnnotationTag::TraitSource(trait_name.to_string()),
    )
}

/// Name of the trait a property was composed from, if any.
pub fn trait_source(property: &ModelProperty) -> Option<&str> {
    match property.annotation(AnnotationKind::TraitSource) {
        Some(AnnotationTag::TraitSource(name)) => Some(name.as_str()),
        _ => None,
    }
}

/// Whether the property is an envelope installed by a trait override.
pub fn is_override(property: &ModelProperty) -> bool {
    property.has_annotation(AnnotationKind::TraitOverride)
}

/// Declared name of a trait model: its `@trait` name, or the model name.
pub fn trait_name(model: &Model) -> &str {
    match model.annotation(AnnotationKind::Trait) {
        Some(AnnotationTag::Trait(name)) => name,
        _ => &model.name,
    }
}

/// Properties of one model grouped by the trait they came from.
#[derive(Debug, Default)]
pub struct TraitIndex<'a> {
    entries: BTreeMap<&'a str, Vec<&'a ModelProperty>>,
}

impl<'a> TraitIndex<'a> {
    pub fn build(properties: &'a [ModelProperty]) -> Self {
        let mut entries: BTreeMap<&str, Vec<&ModelProperty>> = BTreeMap::new();
        for property in properties {
            if let Some(name) = trait_source(property) {
                entries.entry(name).or_default().push(property);
            }
        }
        Self { entries }
    }

    /// Properties contributed by a trait, in model order.
    pub fn get(&self, trait_name: &str) -> &[&'a ModelProperty] {
        self.entries
            .get(trait_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The override envelope for a trait, if one was installed.
    pub fn override_envelope(&self, trait_name: &str) -> Option<&'a ModelProperty> {
        self.get(trait_name).iter().copied().find(|p| is_override(p))
    }

    pub fn trait_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }
}

/// Resolve the effective contents of a trait on a model by trait name.
///
/// An override envelope wins outright. Otherwise envelope properties (typed
/// as the trait model) are expanded to that model's properties, and
/// properties selected directly into the model are returned as-is.
pub fn trait_properties<G: SchemaGraph + ?Sized>(
    graph: &G,
    model: &str,
    trait_name: &str,
) -> Result<Vec<ModelProperty>, TraitError> {
    let properties = graph.properties(model)?;
    let index = TraitIndex::build(properties);

    if let Some(envelope) = index.override_envelope(trait_name) {
        if let Some(inner) = envelope.ty.as_model() {
            return Ok(graph.properties(inner)?.to_vec());
        }
    }

    let mut resolved = Vec::new();
    for property in index.get(trait_name) {
        match property.ty.as_model() {
            Some(inner) if is_envelope(graph, property) => {
                resolved.extend(graph.properties(inner)?.iter().cloned());
            }
            _ => resolved.push((*property).clone()),
        }
    }
    Ok(resolved)
}

fn is_envelope<G: SchemaGraph + ?Sized>(graph: &G, property: &ModelProperty) -> bool {
    if is_override(property) {
        return true;
    }
    // A model-typed property is an envelope only when the referenced model
    // is the trait itself, not an ordinary nested type.
    match (property.ty.as_model(), trait_source(property)) {
        (Some(inner), Some(source)) => graph
            .model(inner)
            .map(|m| trait_name(m) == source)
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryGraph, TypeRef};

    fn sourced(name: &str, source: &str) -> ModelProperty {
        ModelProperty::new(name, TypeRef::scalar("string"))
            .with(AnnotationTag::TraitSource(source.into()))
    }

    #[test]
    fn trait_name_prefers_declared_name() {
        let model = Model::new("PagingTrait").with(AnnotationTag::Trait("Paging".into()));
        assert_eq!(trait_name(&model), "Paging");
        assert_eq!(trait_name(&Model::new("Etag")), "Etag");
    }

    #[test]
    fn record_overwrites_source() {
        let mut graph = MemoryGraph::new();
        graph.insert_model(Model::new("Traits").property(sourced("paging", "Old")));

        record_trait_source(&mut graph, "Traits", "paging", "Paging").unwrap();

        let prop = graph.model("Traits").unwrap().get("paging").unwrap();
        assert_eq!(trait_source(prop), Some("Paging"));
    }

    #[test]
    fn record_on_missing_property_fails() {
        let mut graph = MemoryGraph::new();
        graph.insert_model(Model::new("Traits"));
        assert!(matches!(
            record_trait_source(&mut graph, "Traits", "paging", "Paging"),
            Err(TraitError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn index_groups_by_source() {
        let props = vec![
            sourced("nextLink", "Paging"),
            ModelProperty::new("id", TypeRef::scalar("string")),
            sourced("etag", "Conditional"),
            sourced("maxPageSize", "Paging"),
        ];
        let index = TraitIndex::build(&props);

        assert_eq!(index.trait_names().collect::<Vec<_>>(), ["Conditional", "Paging"]);
        let paging: Vec<_> = index.get("Paging").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(paging, ["nextLink", "maxPageSize"]);
        assert!(index.get("Missing").is_empty());
        assert!(index.override_envelope("Paging").is_none());
    }

    #[test]
    fn trait_properties_expands_envelopes() {
        let mut graph = MemoryGraph::new();
        graph.insert_model(
            Model::new("Paging")
                .property(ModelProperty::new("nextLink", TypeRef::scalar("string"))),
        );
        graph.insert_model(
            Model::new("Traits").property(
                ModelProperty::new("paging", TypeRef::model("Paging"))
                    .with(AnnotationTag::TraitSource("Paging".into())),
            ),
        );

        let props = trait_properties(&graph, "Traits", "Paging").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].name, "nextLink");
    }
}
