//! Compilation context passed through pipeline phases.

use gozer_ir::ServiceIR;
use gozer_spec::ServiceSpec;

use super::diagnostic::{Diagnostic, Severity};
use crate::{classifier::Classifier, naming::Naming};

/// Resolvers consulted while lowering.
#[derive(Debug, Clone, Default)]
pub struct LowerOptions {
    pub naming: Naming,
    pub classifier: Classifier,
}

/// State of one spec file moving through the pipeline.
#[derive(Debug)]
pub struct CompilationContext {
    /// File stem of the spec, e.g. `user` for `desc/user.toml`.
    pub source: String,
    pub spec: ServiceSpec,
    pub options: LowerOptions,
    /// The lowered IR (populated by LowerPhase).
    pub ir: Option<ServiceIR>,
    /// Labels of groups left out because their policy did not resolve.
    pub skipped_groups: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(spec: ServiceSpec, source: impl Into<String>, options: LowerOptions) -> Self {
        Self {
            source: source.into(),
            spec,
            options,
            ir: None,
            skipped_groups: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }
}
