//! Api command report data structures.

use std::path::{Path, PathBuf};

use gozer_codegen::generation::PreviewEntry;
use gozer_codegen_go::{ApiReport, SpecOutcome, SpecStatus};

use super::{
    file_counts,
    output::{Output, Report},
    render_error,
};

/// Report data from route-spec generation.
#[derive(Debug)]
pub struct ApiSummary {
    pub output_dir: PathBuf,
    pub specs: Vec<SpecEntry>,
    /// Write counts, e.g. `7 written, 0 replaced, 0 kept`.
    pub files: String,
}

#[derive(Debug)]
pub struct SpecEntry {
    pub path: PathBuf,
    pub state: SpecState,
    /// Diagnostics other than the ones behind `state`.
    pub diagnostics: Vec<String>,
}

#[derive(Debug)]
pub enum SpecState {
    Generated {
        routes: usize,
        skipped_groups: Vec<String>,
        backup: Option<PathBuf>,
    },
    /// Rendered error.
    Failed(String),
}

impl SpecEntry {
    pub(crate) fn from_outcome(outcome: &SpecOutcome) -> Self {
        let state = match &outcome.status {
            SpecStatus::Ok {
                routes,
                skipped_groups,
            } => SpecState::Generated {
                routes: *routes,
                skipped_groups: skipped_groups.clone(),
                backup: outcome.backup.clone(),
            },
            SpecStatus::Failed(err) => SpecState::Failed(render_error(err)),
            SpecStatus::Aborted(err) => SpecState::Failed(format!("error: {:#}", err)),
        };
        Self {
            path: outcome.path.clone(),
            state,
            diagnostics: outcome.diagnostics.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl ApiSummary {
    pub fn new(output_dir: &Path, report: &ApiReport) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            specs: report.specs.iter().map(SpecEntry::from_outcome).collect(),
            files: file_counts(&report.stats),
        }
    }
}

impl Report for ApiSummary {
    fn render(&self, out: &mut dyn Output) {
        for spec in &self.specs {
            for diagnostic in &spec.diagnostics {
                out.warning(&format!("{}: {}", spec.path.display(), diagnostic));
            }
        }

        out.section("Specs");
        for spec in &self.specs {
            match &spec.state {
                SpecState::Generated {
                    routes,
                    skipped_groups,
                    backup,
                } => {
                    out.added_item(&format!(
                        "{} ({} route{})",
                        spec.path.display(),
                        routes,
                        if *routes == 1 { "" } else { "s" }
                    ));
                    for group in skipped_groups {
                        out.key_value_indented("skipped", group);
                    }
                    if let Some(backup) = backup {
                        out.key_value_indented("backup", &backup.display().to_string());
                    }
                }
                SpecState::Failed(_) => {
                    out.skipped_item(&format!("{} (failed)", spec.path.display()))
                }
            }
        }

        for spec in &self.specs {
            if let SpecState::Failed(error) = &spec.state {
                out.newline();
                out.error(error);
            }
        }

        out.newline();
        out.key_value("Generated", &self.output_dir.display().to_string());
        out.key_value("Files", &self.files);
    }
}

/// Files a dry run would write.
#[derive(Debug)]
pub struct ApiPreview {
    pub files: Vec<PreviewEntry>,
}

impl Report for ApiPreview {
    fn render(&self, out: &mut dyn Output) {
        for file in &self.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", self.files.len()));
    }
}
