//! Mode orchestrators: route-spec (`api`) and schema-driven (`crud`).

mod api;
mod crud;

pub use api::{ApiGenerator, ApiReport, SpecOutcome, SpecStatus};
pub use crud::{CrudGenerator, CrudReport, TableOutcome, TableStatus};
use gozer_codegen::generation::Artifact;
use gozer_core::GeneratedFile;
use gozer_ir::ArtifactKind;

use crate::Templates;

/// Render `file` into an artifact of `kind`.
fn emit<F: GeneratedFile>(kind: ArtifactKind, file: &F) -> Artifact {
    let artifact = Artifact::from_generated(kind, file);
    tracing::debug!(
        %kind,
        template = Templates::for_kind(kind),
        path = %artifact.path,
        "rendered artifact"
    );
    artifact
}
