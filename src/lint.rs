//! Static checks on trait model declarations.
//!
//! Flags trait models that can never contribute anything:
//! - properties without a `@traitLocation` (never selected)
//! - trait models with no properties at all

use crate::diagnostics::{Diagnostic, EMPTY_TRAIT, UNLOCATED_TRAIT_PROPERTY};
use crate::error::TraitError;
use crate::graph::{SchemaGraph, Target};
use crate::registry::trait_name;
use crate::types::AnnotationKind;

/// Lint a single trait model.
pub fn lint_trait<G: SchemaGraph + ?Sized>(
    graph: &G,
    trait_model: &str,
) -> Result<Vec<Diagnostic>, TraitError> {
    let model = graph.require_model(trait_model)?;
    let name = trait_name(model);

    if model.properties.is_empty() {
        return Ok(vec![Diagnostic::warning(
            EMPTY_TRAIT,
            Target::model(trait_model),
            format!("trait '{}' has no properties", name),
        )]);
    }

    Ok(model
        .properties
        .iter()
        .filter(|p| !p.has_annotation(AnnotationKind::TraitLocation))
        .map(|p| {
            Diagnostic::warning(
                UNLOCATED_TRAIT_PROPERTY,
                Target::property(trait_model, &p.name),
                format!(
                    "property '{}' of trait '{}' has no {} and will never be selected",
                    p.name,
                    name,
                    AnnotationKind::TraitLocation.decorator()
                ),
            )
        })
        .collect())
}
