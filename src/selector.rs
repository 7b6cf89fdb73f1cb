//! Trait property selection.
//!
//! Copies the properties of a trait model that apply to a location and a set
//! of contexts into a target model, recording each copy's trait source.

use log::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink, FOREIGN_COLLISION, TRAIT_CONFLICT};
use crate::error::TraitError;
use crate::graph::{ModelProperty, SchemaGraph, Target};
use crate::registry::{trait_name, trait_source, TraitIndex};
use crate::types::{
    AnnotationKind, AnnotationTag, ConflictPolicy, ContextSet, SelectOptions, TraitLocation,
};

/// Copy the applicable properties of `trait_model` into `target`.
///
/// Properties are visited in the trait model's declaration order. Each copy
/// keeps the original type, optionality and annotations and is tagged with
/// the trait's name. The trait model is never modified.
///
/// Collisions on `target` are reported, not fatal:
/// - a property with no trait source is a foreign collision (`E001`)
/// - a property from the same trait is left as-is
/// - a property from another trait is a trait conflict (`E002`) unless the
///   conflict policy is last-write-wins
///
/// A trait whose name is held by an override of a different model is skipped.
///
/// # Errors
///
/// Returns `TraitError::UnknownModel` if either model does not exist.
pub fn add_trait_properties<G, S>(
    graph: &mut G,
    target: &str,
    trait_model: &str,
    options: &SelectOptions,
    sink: &mut S,
) -> Result<(), TraitError>
where
    G: SchemaGraph + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let source = graph.require_model(trait_model)?;
    let name = trait_name(source).to_string();
    let candidates: Vec<ModelProperty> = source
        .properties
        .iter()
        .filter(|p| applies(p, options.location, &options.contexts))
        .cloned()
        .collect();

    if let Some(model) = override_model(graph, target, &name)? {
        if model != trait_model {
            debug!(
                "trait '{}' on {} is superseded by override '{}', skipping {}",
                name, target, model, trait_model
            );
            return Ok(());
        }
    }

    for mut property in candidates {
        let existing = graph
            .properties(target)?
            .iter()
            .find(|p| p.name == property.name)
            .map(|p| trait_source(p).map(str::to_string));

        match existing {
            None => {}
            Some(None) => {
                sink.report(Diagnostic::error(
                    FOREIGN_COLLISION,
                    Target::property(target, &property.name),
                    format!(
                        "property '{}' from trait '{}' collides with an existing property of {}",
                        property.name, name, target
                    ),
                ));
                continue;
            }
            Some(Some(existing)) if existing == name => {
                debug!("{}.{} already provided by '{}'", target, property.name, name);
                continue;
            }
            Some(Some(existing)) => {
                if options.on_conflict == ConflictPolicy::Report {
                    sink.report(Diagnostic::error(
                        TRAIT_CONFLICT,
                        Target::property(target, &property.name),
                        format!(
                            "property '{}' from trait '{}' conflicts with trait '{}'",
                            property.name, name, existing
                        ),
                    ));
                    continue;
                }
                debug!(
                    "{}.{} from '{}' replaces the one from '{}'",
                    target, property.name, name, existing
                );
                graph.remove_property(target, &property.name)?;
            }
        }

        property.set_annotation(AnnotationTag::TraitSource(name.clone()));
        graph.add_property(target, property)?;
    }

    Ok(())
}

/// Whether a trait property applies to a location and requested contexts.
///
/// Properties without a location never apply. Properties without contexts
/// apply in every context. An empty request matches every property context.
pub fn applies(property: &ModelProperty, location: TraitLocation, contexts: &ContextSet) -> bool {
    let located = matches!(
        property.annotation(AnnotationKind::TraitLocation),
        Some(AnnotationTag::TraitLocation(l)) if *l == location
    );
    if !located {
        return false;
    }

    if contexts.is_empty() {
        return true;
    }
    match property.annotation(AnnotationKind::TraitContext) {
        Some(AnnotationTag::TraitContext(declared)) => declared.intersects(contexts),
        _ => true,
    }
}

/// Model installed by an override for `trait_name` on `target`, if any.
fn override_model<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &str,
    trait_name: &str,
) -> Result<Option<String>, TraitError> {
    let properties = graph.properties(target)?;
    Ok(TraitIndex::build(properties)
        .override_envelope(trait_name)
        .and_then(|p| p.ty.as_model())
        .map(str::to_string))
}
