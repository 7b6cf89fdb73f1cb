//! Trait overrides.
//!
//! An override installs a whole trait model on a target as a single envelope
//! property and drops everything the target previously held under the same
//! trait name. Supersession is a replace-or-insert on the target's trait
//! index, keyed by trait name.

use log::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink, FOREIGN_COLLISION, TRAIT_CONFLICT};
use crate::error::TraitError;
use crate::graph::{ModelProperty, SchemaGraph, Target, TypeRef};
use crate::registry::{is_override, trait_name, trait_source, TraitIndex};
use crate::types::AnnotationTag;

/// Install `trait_model` on `target`, superseding any trait of the same name.
///
/// Overriding a trait that is not present yet installs it. Applying the same
/// override twice leaves the target unchanged; a different model for the same
/// name replaces the earlier one.
///
/// # Errors
///
/// Returns `TraitError::UnknownModel` if either model does not exist.
pub fn apply_trait_override<G, S>(
    graph: &mut G,
    target: &str,
    trait_model: &str,
    sink: &mut S,
) -> Result<(), TraitError>
where
    G: SchemaGraph + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let name = trait_name(graph.require_model(trait_model)?).to_string();
    let envelope = envelope_name(&name);

    let properties = graph.properties(target)?;
    let index = TraitIndex::build(properties);

    if let Some(current) = index.override_envelope(&name) {
        if current.ty.as_model() == Some(trait_model) {
            debug!("override '{}' already applied to {}", name, target);
            return Ok(());
        }
    }

    // The envelope slot must not be held by something outside this trait.
    if let Some(holder) = properties.iter().find(|p| p.name == envelope) {
        let diagnostic = match trait_source(holder) {
            Some(source) if source == name => None,
            Some(source) => Some(Diagnostic::error(
                TRAIT_CONFLICT,
                Target::property(target, &envelope),
                format!(
                    "override envelope for trait '{}' conflicts with trait '{}'",
                    name, source
                ),
            )),
            None => Some(Diagnostic::error(
                FOREIGN_COLLISION,
                Target::property(target, &envelope),
                format!(
                    "override envelope for trait '{}' collides with an existing property of {}",
                    name, target
                ),
            )),
        };
        if let Some(diagnostic) = diagnostic {
            sink.report(diagnostic);
            return Ok(());
        }
    }

    let superseded: Vec<String> = index
        .get(&name)
        .iter()
        .map(|p| p.name.clone())
        .collect();
    for property in &superseded {
        debug!("{}.{} superseded by override '{}'", target, property, trait_model);
        graph.remove_property(target, property)?;
    }

    let property = ModelProperty::new(envelope, TypeRef::model(trait_model))
        .optional()
        .with(AnnotationTag::TraitSource(name))
        .with(AnnotationTag::TraitOverride);
    graph.add_property(target, property)
}

/// Envelope property name for an override of a trait.
///
/// The trait name with a lowercase head and an `Override` suffix, so the
/// envelope never shares a name with a property selected from a trait.
pub fn envelope_name(trait_name: &str) -> String {
    let mut chars = trait_name.chars();
    let head: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{}Override", head)
}

/// Override envelopes currently installed on a model.
pub fn overrides<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &str,
) -> Result<Vec<ModelProperty>, TraitError> {
    Ok(graph
        .properties(target)?
        .iter()
        .filter(|p| is_override(p))
        .cloned()
        .collect())
}
