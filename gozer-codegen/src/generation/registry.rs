//! Artifact registration for declarative code generation.
//!
//! Emitters register artifacts with their overwrite rules; the registry
//! writes them in registration order and reports what happened to each.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ArtifactRegistry::new();
//! let routes_path = "internal/handler/routes.go";
//! registry.register(Artifact::generated(ArtifactKind::Routes, routes_path, routes));
//! let logic_path = "internal/logic/user/create_user.go";
//! registry.register(Artifact::scaffold(ArtifactKind::Logic, logic_path, logic, false));
//! let stats = registry.write_all(&output_dir)?;
//! ```

use std::path::Path;

use eyre::Result;
use gozer_core::{File, FileRules, GeneratedFile, WriteResult};
use gozer_ir::ArtifactKind;

/// One emitted file waiting to be written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Path relative to the output directory, always with `/` separators.
    pub path: String,
    pub content: String,
    pub rules: FileRules,
}

impl Artifact {
    pub fn new(
        kind: ArtifactKind,
        path: impl Into<String>,
        content: impl Into<String>,
        rules: FileRules,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            content: content.into(),
            rules,
        }
    }

    /// An artifact the generator owns: replaced on every run.
    pub fn generated(
        kind: ArtifactKind,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(kind, path, content, FileRules::generated())
    }

    /// A scaffold the user edits: written only when missing unless `overwrite`.
    pub fn scaffold(
        kind: ArtifactKind,
        path: impl Into<String>,
        content: impl Into<String>,
        overwrite: bool,
    ) -> Self {
        Self::new(kind, path, content, FileRules::scaffold(overwrite))
    }

    /// Render a [`GeneratedFile`] into an artifact, keeping its path and rules.
    pub fn from_generated<F: GeneratedFile>(kind: ArtifactKind, file: &F) -> Self {
        let path = file
            .path(Path::new(""))
            .to_string_lossy()
            .replace('\\', "/");
        Self::new(kind, path, file.render(), file.rules())
    }

    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        File::new(base.join(&self.path), self.content.as_str())
            .with_rules(self.rules.clone())
            .write()
    }
}

/// Collects artifacts for one generation unit.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    artifacts: Vec<Artifact>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// What would be written, without touching the disk.
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.artifacts
            .iter()
            .map(|a| PreviewEntry {
                kind: a.kind,
                path: a.path.clone(),
                content: a.content.clone(),
            })
            .collect()
    }

    /// Write every artifact under `base`.
    ///
    /// Stops at the first I/O failure; files written before it stay on disk.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();
        if self.is_empty() {
            return Ok(stats);
        }
        tracing::debug!(artifacts = self.len(), base = %base.display(), "writing artifacts");
        for artifact in &self.artifacts {
            let result = artifact.write(base)?;
            stats.record(&artifact.path, result);
        }
        Ok(stats)
    }
}

#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub kind: ArtifactKind,
    pub path: String,
    pub content: String,
}

/// Outcome of a write pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: Vec<String>,
    pub replaced: Vec<String>,
    pub skipped: Vec<String>,
}

impl WriteStats {
    pub fn record(&mut self, path: &str, result: WriteResult) {
        let bucket = match result {
            WriteResult::Written => &mut self.written,
            WriteResult::Replaced => &mut self.replaced,
            WriteResult::Skipped => &mut self.skipped,
        };
        bucket.push(path.to_string());
    }

    pub fn merge(&mut self, other: WriteStats) {
        self.written.extend(other.written);
        self.replaced.extend(other.replaced);
        self.skipped.extend(other.skipped);
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.replaced.len() + self.skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_generated_artifacts_are_replaced() {
        let temp = TempDir::new().unwrap();
        let mut registry = ArtifactRegistry::new();
        registry.register(Artifact::generated(
            ArtifactKind::Routes,
            "internal/handler/routes.go",
            "package handler\n",
        ));

        let first = registry.write_all(temp.path()).unwrap();
        assert_eq!(first.written, ["internal/handler/routes.go"]);

        let second = registry.write_all(temp.path()).unwrap();
        assert_eq!(second.replaced, ["internal/handler/routes.go"]);

        let content =
            std::fs::read_to_string(temp.path().join("internal/handler/routes.go")).unwrap();
        assert!(content.starts_with(gozer_core::GENERATED_HEADER));
    }

    #[test]
    fn test_scaffold_keeps_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logic.go");
        std::fs::write(&path, "user code").unwrap();

        let mut registry = ArtifactRegistry::new();
        registry.register(Artifact::scaffold(ArtifactKind::Logic, "logic.go", "stub", false));
        let stats = registry.write_all(temp.path()).unwrap();

        assert_eq!(stats.skipped, ["logic.go"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "user code");

        let mut registry = ArtifactRegistry::new();
        registry.register(Artifact::scaffold(ArtifactKind::Logic, "logic.go", "stub", true));
        registry.write_all(temp.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "stub");
    }

    #[test]
    fn test_preview_and_kinds() {
        let mut registry = ArtifactRegistry::new();
        registry.register(Artifact::generated(ArtifactKind::Types, "types.go", "a"));
        registry.register(Artifact::generated(ArtifactKind::Handler, "h1.go", "b"));
        registry.register(Artifact::generated(ArtifactKind::Handler, "h2.go", "c"));

        let preview = registry.preview();
        let handlers = preview
            .iter()
            .filter(|p| p.kind == ArtifactKind::Handler)
            .count();
        assert_eq!(handlers, 2);
        assert_eq!(preview[0].path, "types.go");
        assert_eq!(preview.len(), registry.len());
    }

    struct Stub;

    impl GeneratedFile for Stub {
        fn path(&self, base: &Path) -> std::path::PathBuf {
            base.join("internal").join("svc").join("service_context.go")
        }

        fn rules(&self) -> FileRules {
            FileRules::generated()
        }

        fn render(&self) -> String {
            "package svc\n".to_string()
        }
    }

    #[test]
    fn test_from_generated_file() {
        let artifact = Artifact::from_generated(ArtifactKind::Context, &Stub);
        assert_eq!(artifact.path, "internal/svc/service_context.go");
        assert_eq!(artifact.content, "package svc\n");
        assert_eq!(artifact.rules.header, Some(gozer_core::GENERATED_HEADER));
    }

    #[test]
    fn test_stats_merge() {
        let mut a = WriteStats::default();
        a.record("a.go", WriteResult::Written);
        let mut b = WriteStats::default();
        b.record("b.go", WriteResult::Skipped);
        a.merge(b);
        assert_eq!(a.total(), 2);
    }
}
