//! Parameter shape checks.
//!
//! Every property of a parameter model must be marked as a query parameter
//! (or, for header models, as a header). These checks only read the graph.

use crate::diagnostics::{Diagnostic, MISSING_PARAM_ANNOTATION};
use crate::error::TraitError;
use crate::graph::{SchemaGraph, Target};
use crate::types::AnnotationKind;

/// Annotation every property of a parameter model must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Query,
    Header,
}

impl ParamKind {
    pub fn annotation(&self) -> AnnotationKind {
        match self {
            ParamKind::Query => AnnotationKind::Query,
            ParamKind::Header => AnnotationKind::Header,
        }
    }
}

/// Check that every property of `param_model` carries the annotation for `kind`.
///
/// Returns one diagnostic per offending property, in declaration order.
/// An absent `param_model` is a no-op.
///
/// # Errors
///
/// Returns `TraitError::UnknownModel` if `target` or `param_model` does not exist.
pub fn ensure_all_params<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &str,
    param_model: Option<&str>,
    kind: ParamKind,
) -> Result<Vec<Diagnostic>, TraitError> {
    graph.require_model(target)?;
    let Some(param_model) = param_model else {
        return Ok(Vec::new());
    };

    let required = kind.annotation();
    Ok(graph
        .properties(param_model)?
        .iter()
        .filter(|p| !p.has_annotation(required))
        .map(|p| {
            Diagnostic::error(
                MISSING_PARAM_ANNOTATION,
                Target::property(param_model, &p.name),
                format!(
                    "property '{}' of {} must be marked {} (required by {})",
                    p.name,
                    param_model,
                    required.decorator(),
                    target
                ),
            )
        })
        .collect())
}

/// Check that every property of `param_model` is a query parameter.
pub fn ensure_all_query_params<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &str,
    param_model: Option<&str>,
) -> Result<Vec<Diagnostic>, TraitError> {
    ensure_all_params(graph, target, param_model, ParamKind::Query)
}

/// Check that every property of `param_model` is a header.
pub fn ensure_all_header_params<G: SchemaGraph + ?Sized>(
    graph: &G,
    target: &str,
    param_model: Option<&str>,
) -> Result<Vec<Diagnostic>, TraitError> {
    ensure_all_params(graph, target, param_model, ParamKind::Header)
}
