//! Check command report data structures.

use std::path::{Path, PathBuf};

use gozer_codegen_go::SpecOutcome;

use super::{
    api::{SpecEntry, SpecState},
    output::{Output, Report},
};

/// Report data from spec validation.
#[derive(Debug)]
pub struct CheckReport {
    pub dir: PathBuf,
    pub specs: Vec<SpecEntry>,
}

impl CheckReport {
    pub fn new(dir: &Path, outcomes: &[SpecOutcome]) -> Self {
        Self {
            dir: dir.to_path_buf(),
            specs: outcomes.iter().map(SpecEntry::from_outcome).collect(),
        }
    }

    /// Whether every spec parsed and lowered without errors.
    pub fn is_valid(&self) -> bool {
        self.specs.iter().all(|spec| match &spec.state {
            SpecState::Generated { skipped_groups, .. } => skipped_groups.is_empty(),
            SpecState::Failed(_) => false,
        })
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for spec in &self.specs {
            for diagnostic in &spec.diagnostics {
                out.warning(&format!("{}: {}", spec.path.display(), diagnostic));
            }
            if let SpecState::Failed(error) = &spec.state {
                out.error(error);
            }
        }

        if self.specs.is_empty() {
            out.warning(&format!("no service spec found in {}", self.dir.display()));
            return;
        }

        if self.is_valid() {
            let routes: usize = self
                .specs
                .iter()
                .map(|spec| match spec.state {
                    SpecState::Generated { routes, .. } => routes,
                    SpecState::Failed(_) => 0,
                })
                .sum();
            out.preformatted(&format!(
                "✓ {} spec{} in {} are valid ({} routes)",
                self.specs.len(),
                if self.specs.len() == 1 { "" } else { "s" },
                self.dir.display(),
                routes
            ));
        }
    }
}
