//! Expected trait checks.

use std::collections::BTreeSet;

use crate::diagnostics::{Diagnostic, EXPECTED_TRAIT_MISSING};
use crate::error::TraitError;
use crate::graph::{SchemaGraph, Target};
use crate::registry::trait_source;
use crate::types::ExpectedTrait;

/// Check that `trait_model` holds every expected trait.
///
/// A trait is present when any property of `trait_model` records it as its
/// trait source. Each missing trait yields one diagnostic on `target` carrying
/// the expected trait's message, in the order `expected` lists them.
///
/// # Errors
///
/// Returns `TraitError::InvalidTarget` if `target` is a property,
/// `TraitError::UnknownTarget` if it is not in the graph, and
/// `TraitError::UnknownModel` if `trait_model` does not exist.
pub fn ensure_traits_present<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &Target,
    trait_model: &str,
    expected: &[ExpectedTrait],
) -> Result<Vec<Diagnostic>, TraitError> {
    if let Target::Property { .. } = target {
        return Err(TraitError::InvalidTarget {
            operation: "ensureTraitsPresent",
            expected: "interface, operation or model",
            actual: target.to_string(),
        });
    }
    if !graph.contains(target) {
        return Err(TraitError::UnknownTarget {
            kind: target.kind(),
            name: target.name().to_string(),
        });
    }

    let present: BTreeSet<&str> = graph
        .properties(trait_model)?
        .iter()
        .filter_map(trait_source)
        .collect();

    let mut reported = BTreeSet::new();
    Ok(expected
        .iter()
        .filter(|e| !present.contains(e.trait_name.as_str()))
        .filter(|e| reported.insert(e.trait_name.as_str()))
        .map(|e| Diagnostic::error(EXPECTED_TRAIT_MISSING, target.clone(), &e.diagnostic_message))
        .collect())
}

/// Trait model an operation declares for its composed traits.
///
/// Used when a presence check names no trait model explicitly.
///
/// # Errors
///
/// Returns `TraitError::UnknownTarget` if `target` is not in the graph, and
/// `TraitError::InvalidTarget` if it is not an operation declaring `traits`.
pub fn declared_trait_model<'g, G: SchemaGraph + ?Sized>(
    graph: &'g G,
    target: &Target,
) -> Result<&'g str, TraitError> {
    if !graph.contains(target) {
        return Err(TraitError::UnknownTarget {
            kind: target.kind(),
            name: target.name().to_string(),
        });
    }
    let declared = match target {
        Target::Operation(name) => graph.operation_traits(name),
        _ => None,
    };
    declared.ok_or_else(|| TraitError::InvalidTarget {
        operation: "ensureTraitsPresent",
        expected: "an operation declaring traits",
        actual: target.to_string(),
    })
}
