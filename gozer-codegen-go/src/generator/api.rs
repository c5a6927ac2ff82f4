use std::path::{Path, PathBuf};

use chrono::Utc;
use eyre::{Result, WrapErr, eyre};
use gozer_codegen::{
    Error,
    classifier::Classifier,
    generation::{
        ArtifactRegistry, BACKUP_DIR_NAME, PreviewEntry, WriteStats, backup_and_sweep,
        reformat_spec,
    },
    pipeline::{CompilationContext, Diagnostic, LowerOptions, Pipeline},
};
use gozer_ir::{ArtifactKind, GroupIR, ServiceIR};
use gozer_spec::{CONFIG_FILE_NAME, ServiceSpec};

use super::emit;
use crate::{
    GoSettings,
    files::{HandlerGo, LogicGo, RoutesGo, ServiceContextGo, TypesGo},
};

/// Route-spec mode: spec files in, handlers, logic, types, routes and
/// service context out. Every artifact is replaced on each run.
pub struct ApiGenerator {
    settings: GoSettings,
    options: LowerOptions,
    backup_dir: PathBuf,
}

/// What happened to one spec file.
#[derive(Debug)]
pub enum SpecStatus {
    /// Lowered and, outside of `check`, written.
    Ok {
        routes: usize,
        skipped_groups: Vec<String>,
    },
    /// Parsing or validation failed.
    Failed(Box<Error>),
    /// Lowering or handler/logic emission failed.
    Aborted(eyre::Report),
}

#[derive(Debug)]
pub struct SpecOutcome {
    pub path: PathBuf,
    pub status: SpecStatus,
    pub diagnostics: Vec<Diagnostic>,
    /// Copy taken before the file was reformatted in place.
    pub backup: Option<PathBuf>,
}

impl SpecOutcome {
    fn new(path: &Path, status: SpecStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            diagnostics: Vec::new(),
            backup: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, SpecStatus::Ok { .. })
    }
}

#[derive(Debug, Default)]
pub struct ApiReport {
    pub specs: Vec<SpecOutcome>,
    pub stats: WriteStats,
}

impl ApiReport {
    pub fn failed(&self) -> impl Iterator<Item = &SpecOutcome> {
        self.specs.iter().filter(|s| !s.is_ok())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

impl ApiGenerator {
    pub fn new(settings: GoSettings) -> Self {
        let options = LowerOptions {
            naming: settings.naming,
            classifier: Classifier::default(),
        };
        Self {
            settings,
            options,
            backup_dir: std::env::temp_dir().join(BACKUP_DIR_NAME),
        }
    }

    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = dir.into();
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.options.classifier = classifier;
        self
    }

    /// Spec files in `dir`: every `*.toml` except `gozer.toml`, sorted by name.
    pub fn spec_files(dir: &Path) -> gozer_codegen::Result<Vec<PathBuf>> {
        let fs_error = |source| {
            Box::new(Error::FileSystem {
                path: dir.to_path_buf(),
                source,
            })
        };
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(fs_error)? {
            let path = entry.map_err(fs_error)?.path();
            let is_spec = path.is_file()
                && path.extension().is_some_and(|e| e == "toml")
                && path.file_name().is_some_and(|n| n != CONFIG_FILE_NAME);
            if is_spec {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse and lower every file without writing anything.
    pub fn check(&self, files: &[PathBuf]) -> Vec<SpecOutcome> {
        files
            .iter()
            .map(|path| match self.lower(path) {
                Ok(ctx) => {
                    let mut outcome = SpecOutcome::new(path, status_of(&ctx));
                    outcome.diagnostics = ctx.diagnostics;
                    outcome
                }
                Err(outcome) => outcome,
            })
            .collect()
    }

    /// Generate the route-spec output tree for `files` under `output_dir`.
    ///
    /// A file that fails to parse, validate or lower is reported and skipped.
    /// Writing the aggregate files (routes, types, service context) and
    /// backing up a spec are fatal on failure.
    pub fn generate(&self, files: &[PathBuf], output_dir: &Path) -> Result<ApiReport> {
        let mut report = ApiReport::default();
        let mut services: Vec<ServiceIR> = Vec::new();

        for path in files {
            tracing::info!(spec = %path.display(), "processing spec");
            let ctx = match self.lower(path) {
                Ok(ctx) => ctx,
                Err(outcome) => {
                    report.specs.push(outcome);
                    continue;
                }
            };

            let mut outcome = SpecOutcome::new(path, status_of(&ctx));
            outcome.backup = self.format_spec(path)?;
            outcome.diagnostics = ctx.diagnostics;

            let Some(ir) = ctx.ir else {
                outcome.status = SpecStatus::Aborted(eyre!("lowering produced no IR"));
                report.specs.push(outcome);
                continue;
            };

            match self.write_folders(&ir, output_dir) {
                Ok(stats) => {
                    report.stats.merge(stats);
                    services.push(ir);
                }
                Err(err) => {
                    tracing::warn!(spec = %path.display(), error = %err, "skipping spec");
                    outcome.status = SpecStatus::Aborted(err);
                }
            }
            report.specs.push(outcome);
        }

        if services.is_empty() {
            tracing::warn!("no spec was generated, leaving aggregate files untouched");
            return Ok(report);
        }

        let stats = self
            .write_aggregates(&services, output_dir)
            .wrap_err("failed to write aggregate files")?;
        report.stats.merge(stats);
        tracing::info!(
            specs = services.len(),
            files = report.stats.total(),
            "route-spec generation finished"
        );
        Ok(report)
    }

    /// Parse and lower one spec; a failure comes back as a finished outcome.
    fn lower(&self, path: &Path) -> std::result::Result<CompilationContext, SpecOutcome> {
        let spec = ServiceSpec::from_file(path).map_err(|err| {
            tracing::warn!(spec = %path.display(), error = %err, "skipping spec");
            SpecOutcome::new(path, SpecStatus::Failed(err.into()))
        })?;
        let source = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ctx = Pipeline::new()
            .run(spec, &source, self.options.clone())
            .map_err(|err| {
                tracing::warn!(spec = %path.display(), error = %err, "skipping spec");
                SpecOutcome::new(path, SpecStatus::Aborted(err))
            })?;
        if ctx.has_errors() {
            tracing::warn!(
                spec = %path.display(),
                errors = ctx.error_count(),
                skipped = ctx.skipped_groups.len(),
                "spec lowered with errors"
            );
        }
        Ok(ctx)
    }

    /// Reformat `path` in place when that changes it, backing it up first.
    fn format_spec(&self, path: &Path) -> Result<Option<PathBuf>> {
        if !self.settings.format_spec {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let Some(formatted) = reformat_spec(&text) else {
            tracing::warn!(
                spec = %path.display(),
                "reformatting would change spec values, leaving it as is"
            );
            return Ok(None);
        };
        if formatted == text {
            return Ok(None);
        }

        let backup = backup_and_sweep(path, &self.backup_dir, Utc::now())?;
        std::fs::write(path, formatted)
            .wrap_err_with(|| format!("failed to reformat {}", path.display()))?;
        tracing::info!(spec = %path.display(), backup = %backup.display(), "reformatted spec");
        Ok(Some(backup))
    }

    /// Render every artifact `generate` would write, without touching disk.
    ///
    /// Files that fail to parse or lower are left out.
    pub fn preview(&self, files: &[PathBuf]) -> Vec<PreviewEntry> {
        let services: Vec<ServiceIR> = files
            .iter()
            .filter_map(|path| self.lower(path).ok()?.ir)
            .collect();
        let mut registry = ArtifactRegistry::new();
        for ir in &services {
            self.register_folders(ir, &mut registry);
        }
        if !services.is_empty() {
            self.register_aggregates(&services, &mut registry);
        }
        registry.preview()
    }

    fn write_folders(&self, ir: &ServiceIR, output_dir: &Path) -> Result<WriteStats> {
        let mut registry = ArtifactRegistry::new();
        self.register_folders(ir, &mut registry);
        registry.write_all(output_dir)
    }

    fn write_aggregates(&self, services: &[ServiceIR], output_dir: &Path) -> Result<WriteStats> {
        let mut registry = ArtifactRegistry::new();
        self.register_aggregates(services, &mut registry);
        registry.write_all(output_dir)
    }

    /// One handler and one logic file per distinct folder of `ir`.
    fn register_folders(&self, ir: &ServiceIR, registry: &mut ArtifactRegistry) {
        for folder in folders(ir) {
            let handler = HandlerGo::new(&self.settings, ir, folder);
            if handler.is_empty() {
                continue;
            }
            registry.register(emit(ArtifactKind::Handler, &handler));
            registry.register(emit(
                ArtifactKind::Logic,
                &LogicGo::new(&self.settings, ir, folder),
            ));
        }
    }

    fn register_aggregates(&self, services: &[ServiceIR], registry: &mut ArtifactRegistry) {
        let groups: Vec<GroupIR> = services
            .iter()
            .flat_map(|s| s.groups.iter().cloned())
            .collect();
        let mut middleware: Vec<String> = Vec::new();
        for name in services.iter().flat_map(ServiceIR::middleware) {
            if !middleware.contains(&name) {
                middleware.push(name);
            }
        }

        registry.register(emit(
            ArtifactKind::Routes,
            &RoutesGo::new(&self.settings.module_path, &groups),
        ));
        registry.register(emit(
            ArtifactKind::Types,
            &TypesGo::new(services.iter().flat_map(|s| s.types.iter())),
        ));
        registry.register(emit(
            ArtifactKind::Context,
            &ServiceContextGo::new(&self.settings, middleware),
        ));
    }
}

fn status_of(ctx: &CompilationContext) -> SpecStatus {
    SpecStatus::Ok {
        routes: ctx.ir.as_ref().map_or(0, ServiceIR::route_count),
        skipped_groups: ctx.skipped_groups.clone(),
    }
}

/// Distinct effective folders of `ir`, in first-use order.
fn folders(ir: &ServiceIR) -> Vec<Option<&str>> {
    let mut folders: Vec<Option<&str>> = Vec::new();
    for route in ir.groups.iter().flat_map(|g| g.routes.iter()) {
        let folder = route.folder.as_deref();
        if !folders.contains(&folder) {
            folders.push(folder);
        }
    }
    folders
}
