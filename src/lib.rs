//! API Trait Composition
//!
//! Composes optional, named bundles of properties ("traits") into API
//! operation shapes, and checks that required traits and parameter
//! annotations are present.
//!
//! Every operation works on a [`SchemaGraph`]. Schema-authoring mistakes are
//! reported as [`Diagnostic`]s; only invalid arguments return an error.
//!
//! # Example
//!
//! ```
//! use api_traits::{
//!     add_trait_properties, ensure_traits_present, AnnotationTag, ContextSet, Diagnostic,
//!     ExpectedTrait, MemoryGraph, Model, ModelProperty, SelectOptions, Target, TraitContext,
//!     TraitLocation, TypeRef,
//! };
//!
//! let mut graph = MemoryGraph::new();
//! graph.insert_model(
//!     Model::new("Paging").property(
//!         ModelProperty::new("nextLink", TypeRef::scalar("string"))
//!             .optional()
//!             .with(AnnotationTag::TraitLocation(TraitLocation::ResponseBody))
//!             .with(AnnotationTag::TraitContext(ContextSet::from([TraitContext::List]))),
//!     ),
//! );
//! graph.insert_model(Model::new("ListResponse"));
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let options = SelectOptions::new(TraitLocation::ResponseBody, [TraitContext::List]);
//! add_trait_properties(&mut graph, "ListResponse", "Paging", &options, &mut diagnostics).unwrap();
//! assert!(diagnostics.is_empty());
//!
//! let missing = ensure_traits_present(
//!     &graph,
//!     &Target::model("ListResponse"),
//!     "ListResponse",
//!     &[ExpectedTrait::new("Paging", "missing paging")],
//! )
//! .unwrap();
//! assert!(missing.is_empty());
//! ```
//!
//! # Selection Rules
//!
//! | Property tags | Selected when |
//! |---------------|---------------|
//! | no `traitLocation` | never |
//! | `traitLocation` only | location matches |
//! | `traitLocation` + `traitContext` | location matches and contexts intersect (or none requested) |
//!
//! # Collisions
//!
//! | Existing property on target | Result |
//! |-----------------------------|--------|
//! | none | copied |
//! | not from a trait | `E001` foreign collision |
//! | from the same trait | left as-is |
//! | from another trait | `E002` trait conflict, unless last-write-wins |

mod diagnostics;
mod elaborate;
mod error;
mod graph;
mod lint;
mod loader;
mod overrides;
mod params;
mod presence;
mod registry;
mod selector;
mod types;

pub use diagnostics::{
    Diagnostic, DiagnosticSink, Diagnostics, Severity, EMPTY_TRAIT, EXPECTED_TRAIT_MISSING,
    FOREIGN_COLLISION, MISSING_PARAM_ANNOTATION, TRAIT_CONFLICT, UNLOCATED_TRAIT_PROPERTY,
};
pub use elaborate::{elaborate, run_step, ElaborateOptions, Elaboration, Step};
pub use error::{LoadError, TraitError};
pub use graph::{
    Interface, MemoryGraph, Model, ModelProperty, Operation, SchemaGraph, Target, TypeRef,
};
pub use lint::lint_trait;
pub use loader::{load_document, load_document_str, Document};
pub use overrides::{apply_trait_override, envelope_name, overrides};
pub use params::{ensure_all_header_params, ensure_all_params, ensure_all_query_params, ParamKind};
pub use presence::{declared_trait_model, ensure_traits_present};
pub use registry::{
    is_override, record_trait_source, trait_name, trait_properties, trait_source, TraitIndex,
};
pub use selector::{add_trait_properties, applies};
pub use types::{
    AnnotationKind, AnnotationTag, ConflictPolicy, ContextSet, ExpectedTrait, SelectOptions,
    TraitContext, TraitLocation,
};
