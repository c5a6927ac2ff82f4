//! Pipeline orchestrator.

use eyre::Result;
use gozer_spec::ServiceSpec;

use super::{
    CompilationContext, LowerOptions, Phase,
    phases::{LowerPhase, ValidatePhase},
};

/// Runs the built-in phases (validate, lower) followed by any added phases.
pub struct Pipeline {
    phases: Vec<Box<dyn Phase>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { phases: Vec::new() }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Run the pipeline on one spec.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally.
    pub fn run(
        &self,
        spec: ServiceSpec,
        source: &str,
        options: LowerOptions,
    ) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(spec, source, options);

        let builtin_phases: Vec<Box<dyn Phase>> =
            vec![Box::new(ValidatePhase::new()), Box::new(LowerPhase)];

        for phase in builtin_phases.iter().chain(self.phases.iter()) {
            tracing::debug!(phase = phase.name(), source, "running phase");
            phase.run(&mut ctx)?;
        }

        Ok(ctx)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
