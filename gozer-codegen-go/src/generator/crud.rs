use std::path::Path;

use eyre::{Result, WrapErr};
use gozer_codegen::{
    Error,
    generation::{AggregateDescriptor, Artifact, ArtifactRegistry, WriteStats},
    schema::lower_table,
};
use gozer_core::{GeneratedFile, WriteResult};
use gozer_ir::{ArtifactKind, KeyMode, TableIR};
use gozer_spec::SchemaConfig;

use super::emit;
use crate::{
    CrudOperation, GoSettings,
    files::{CrudLogicGo, ModelGo, ProtoGo, umbrella_preamble},
};

/// Umbrella descriptor listing every per-table descriptor.
const UMBRELLA: &str = "desc/all.proto";

/// Schema-driven mode: one set of CRUD logic files, a model, and a merged
/// proto descriptor per table.
pub struct CrudGenerator {
    settings: GoSettings,
}

#[derive(Debug)]
pub enum TableStatus {
    Generated {
        key: KeyMode,
        operations: Vec<CrudOperation>,
    },
    /// The table could not be lowered; other tables were still generated.
    Skipped(Box<Error>),
}

#[derive(Debug)]
pub struct TableOutcome {
    pub table: String,
    pub status: TableStatus,
}

#[derive(Debug, Default)]
pub struct CrudReport {
    pub tables: Vec<TableOutcome>,
    pub stats: WriteStats,
}

impl CrudReport {
    pub fn skipped(&self) -> impl Iterator<Item = &TableOutcome> {
        self.tables
            .iter()
            .filter(|t| matches!(t.status, TableStatus::Skipped(_)))
    }
}

impl CrudGenerator {
    pub fn new(settings: GoSettings) -> Self {
        Self { settings }
    }

    /// Generate every table of `schema` under `output_dir`.
    ///
    /// A table with an unsupported column or no primary key is reported and
    /// skipped. I/O failures abort the run.
    pub fn generate(&self, schema: &SchemaConfig, output_dir: &Path) -> Result<CrudReport> {
        let mut report = CrudReport::default();

        for table in &schema.tables {
            let ir = match lower_table(
                table,
                &self.settings.naming,
                self.settings.search_key_num,
            ) {
                Ok(ir) => ir,
                Err(err) if !err.is_fatal() => {
                    tracing::warn!(table = %table.table_name, error = %err, "skipping table");
                    report.tables.push(TableOutcome {
                        table: table.table_name.clone(),
                        status: TableStatus::Skipped(err),
                    });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            tracing::info!(
                table = %ir.table_name,
                uuid = ir.key.is_uuid(),
                status = ir.has_status,
                "generating table"
            );
            let stats = self
                .write_table(&ir, output_dir)
                .wrap_err_with(|| format!("failed to write table '{}'", ir.table_name))?;
            report.stats.merge(stats);
            report.tables.push(TableOutcome {
                table: ir.table_name.clone(),
                status: TableStatus::Generated {
                    key: ir.key,
                    operations: CrudOperation::for_table(ir.has_status),
                },
            });
        }

        Ok(report)
    }

    fn write_table(&self, table: &TableIR, output_dir: &Path) -> Result<WriteStats> {
        let mut registry = ArtifactRegistry::new();
        for op in CrudOperation::for_table(table.has_status) {
            registry.register(emit(
                ArtifactKind::Logic,
                &CrudLogicGo::new(&self.settings, table, op),
            ));
        }
        registry.register(emit(
            ArtifactKind::Model,
            &ModelGo::new(&self.settings, table),
        ));
        registry.register(self.proto_artifact(table, output_dir)?);
        let mut stats = registry.write_all(output_dir)?;

        let umbrella = output_dir.join(UMBRELLA);
        let existed = umbrella.exists();
        let changed = AggregateDescriptor::merge_into_file(
            &umbrella,
            &umbrella_preamble(&self.settings.proto_package),
            &format!("{}.proto", table.table_name),
        )?;
        let result = match (changed, existed) {
            (false, _) => WriteResult::Skipped,
            (true, false) => WriteResult::Written,
            (true, true) => WriteResult::Replaced,
        };
        stats.record(UMBRELLA, result);
        Ok(stats)
    }

    /// The table's descriptor merged into whatever is already on disk.
    fn proto_artifact(&self, table: &TableIR, output_dir: &Path) -> Result<Artifact> {
        let proto = ProtoGo::new(&self.settings, table);
        let target = proto.path(output_dir);
        let existing = if target.exists() {
            std::fs::read_to_string(&target)
                .wrap_err_with(|| format!("failed to read {}", target.display()))?
        } else {
            String::new()
        };

        let path = proto
            .path(Path::new(""))
            .to_string_lossy()
            .replace('\\', "/");
        tracing::debug!(path, merged = !existing.is_empty(), "merging proto descriptor");
        Ok(Artifact::new(
            ArtifactKind::ProtoMessage,
            path,
            proto.merge_into(&existing),
            proto.rules(),
        ))
    }
}
