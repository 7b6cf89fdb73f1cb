//! Diagnostics reported while composing and checking traits.
//!
//! Codes:
//! - `E001` property name collides with a property not contributed by a trait
//! - `E002` two different traits contribute a property of the same name
//! - `E003` parameter property is missing its required `@query`/`@header`
//! - `E004` expected trait is missing from a composed trait model
//! - `W001` trait property has no location and can never be selected
//! - `W002` trait model has no properties

use serde::Serialize;

use crate::graph::Target;

pub const FOREIGN_COLLISION: &str = "E001";
pub const TRAIT_CONFLICT: &str = "E002";
pub const MISSING_PARAM_ANNOTATION: &str = "E003";
pub const EXPECTED_TRAIT_MISSING: &str = "E004";
pub const UNLOCATED_TRAIT_PROPERTY: &str = "W001";
pub const EMPTY_TRAIT: &str = "W002";

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A single diagnostic attached to a schema entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub target: Target,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &str, target: Target, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            target,
            message: message.into(),
        }
    }

    pub fn warning(code: &str, target: Target, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            target,
            message: message.into(),
        }
    }
}

/// Receiver for diagnostics. Reporting never fails and never blocks.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Diagnostics collected over one elaboration pass.
///
/// Identical diagnostics are kept once, in first-reported order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true if no errors were reported.
    pub fn is_ok(&self) -> bool {
        self.errors() == 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|d| d.severity == severity).count()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        if !self.items.contains(&diagnostic) {
            self.items.push(diagnostic);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
