//! Step-by-step elaboration of a trait document.
//!
//! Steps run in declaration order against one graph. Diagnostics from every
//! step are collected; only invalid arguments stop the run.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
use crate::error::{LoadError, TraitError};
use crate::graph::{MemoryGraph, SchemaGraph, Target};
use crate::lint::lint_trait;
use crate::loader::Document;
use crate::overrides::apply_trait_override;
use crate::params::{ensure_all_params, ParamKind};
use crate::presence::{declared_trait_model, ensure_traits_present};
use crate::registry::record_trait_source;
use crate::selector::add_trait_properties;
use crate::types::{ConflictPolicy, ContextSet, ExpectedTrait, SelectOptions, TraitLocation};

/// One elaboration step, as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    #[serde(rename_all = "camelCase")]
    AddTraitProperties {
        target: String,
        trait_model: String,
        location: TraitLocation,
        #[serde(default)]
        contexts: ContextSet,
        /// Overrides the elaboration-wide conflict policy for this step.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_conflict: Option<ConflictPolicy>,
    },
    #[serde(rename_all = "camelCase")]
    ApplyTraitOverride { target: String, trait_model: String },
    #[serde(rename_all = "camelCase")]
    EnsureAllQueryParams {
        target: String,
        #[serde(default)]
        param_model: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    EnsureAllHeaderParams {
        target: String,
        #[serde(default)]
        param_model: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TraitSource {
        model: String,
        property: String,
        trait_name: String,
    },
    #[serde(rename_all = "camelCase")]
    EnsureTraitsPresent {
        target: Target,
        /// Defaults to the `traits` model of an operation target.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trait_model: Option<String>,
        expected: Vec<ExpectedTrait>,
    },
    #[serde(rename_all = "camelCase")]
    LintTrait { trait_model: String },
}

impl Step {
    /// Operation name as written in documents.
    pub fn name(&self) -> &'static str {
        match self {
            Step::AddTraitProperties { .. } => "addTraitProperties",
            Step::ApplyTraitOverride { .. } => "applyTraitOverride",
            Step::EnsureAllQueryParams { .. } => "ensureAllQueryParams",
            Step::EnsureAllHeaderParams { .. } => "ensureAllHeaderParams",
            Step::TraitSource { .. } => "traitSource",
            Step::EnsureTraitsPresent { .. } => "ensureTraitsPresent",
            Step::LintTrait { .. } => "lintTrait",
        }
    }
}

/// Options for a whole elaboration pass.
#[derive(Debug, Clone, Default)]
pub struct ElaborateOptions {
    /// Conflict policy for steps that don't set their own.
    pub on_conflict: ConflictPolicy,
}

impl ElaborateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default conflict policy.
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }
}

/// Result of elaborating a document.
#[derive(Debug)]
pub struct Elaboration {
    pub graph: MemoryGraph,
    pub diagnostics: Diagnostics,
}

/// Build the document's graph and run all of its steps.
///
/// # Errors
///
/// Returns `LoadError::Duplicate` if a name is declared twice, or
/// `LoadError::Step` wrapping the `TraitError` of a step given invalid
/// arguments.
pub fn elaborate(doc: &Document, options: &ElaborateOptions) -> Result<Elaboration, LoadError> {
    let mut graph = doc.graph()?;
    let mut diagnostics = Diagnostics::new();

    info!(
        "elaborating {} models with {} steps",
        doc.models.len(),
        doc.steps.len()
    );

    for (index, step) in doc.steps.iter().enumerate() {
        debug!("step {}: {}", index, step.name());
        run_step(&mut graph, step, options, &mut diagnostics).map_err(|source| {
            LoadError::Step {
                index,
                op: step.name(),
                source,
            }
        })?;
    }

    info!(
        "elaboration finished: {} errors, {} warnings",
        diagnostics.errors(),
        diagnostics.warnings()
    );

    Ok(Elaboration { graph, diagnostics })
}

/// Run a single step against a graph.
///
/// # Errors
///
/// Propagates the step's `TraitError`.
pub fn run_step<G, S>(
    graph: &mut G,
    step: &Step,
    options: &ElaborateOptions,
    sink: &mut S,
) -> Result<(), TraitError>
where
    G: SchemaGraph + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    match step {
        Step::AddTraitProperties {
            target,
            trait_model,
            location,
            contexts,
            on_conflict,
        } => {
            let select = SelectOptions::new(*location, contexts.clone())
                .on_conflict(on_conflict.unwrap_or(options.on_conflict));
            add_trait_properties(graph, target, trait_model, &select, sink)
        }
        Step::ApplyTraitOverride {
            target,
            trait_model,
        } => apply_trait_override(graph, target, trait_model, sink),
        Step::EnsureAllQueryParams {
            target,
            param_model,
        } => report_all(
            sink,
            ensure_all_params(graph, target, param_model.as_deref(), ParamKind::Query)?,
        ),
        Step::EnsureAllHeaderParams {
            target,
            param_model,
        } => report_all(
            sink,
            ensure_all_params(graph, target, param_model.as_deref(), ParamKind::Header)?,
        ),
        Step::TraitSource {
            model,
            property,
            trait_name,
        } => record_trait_source(graph, model, property, trait_name),
        Step::EnsureTraitsPresent {
            target,
            trait_model,
            expected,
        } => {
            let trait_model = match trait_model {
                Some(model) => model.as_str(),
                None => declared_trait_model(&*graph, target)?,
            };
            report_all(
                sink,
                ensure_traits_present(&*graph, target, trait_model, expected)?,
            )
        }
        Step::LintTrait { trait_model } => report_all(sink, lint_trait(graph, trait_model)?),
    }
}

fn report_all<S: DiagnosticSink + ?Sized>(
    sink: &mut S,
    diagnostics: Vec<Diagnostic>,
) -> Result<(), TraitError> {
    for diagnostic in diagnostics {
        sink.report(diagnostic);
    }
    Ok(())
}
