//! Crud command report data structures.

use std::path::{Path, PathBuf};

use gozer_codegen_go::{CrudReport, TableStatus};

use super::{
    file_counts,
    output::{Output, Report},
    render_error,
};

/// Report data from schema-driven generation.
#[derive(Debug)]
pub struct CrudSummary {
    pub output_dir: PathBuf,
    pub tables: Vec<TableEntry>,
    pub files: String,
    /// Files left alone because they already existed.
    pub kept: Vec<String>,
}

#[derive(Debug)]
pub struct TableEntry {
    pub name: String,
    /// `uuid key, 6 operations`, or the rendered error of a skipped table.
    pub detail: String,
    pub skipped: bool,
}

impl CrudSummary {
    pub fn new(output_dir: &Path, report: &CrudReport) -> Self {
        let tables = report
            .tables
            .iter()
            .map(|table| match &table.status {
                TableStatus::Generated { key, operations } => TableEntry {
                    name: table.table.clone(),
                    detail: format!(
                        "{} key, {} operations",
                        if key.is_uuid() { "uuid" } else { "auto-increment" },
                        operations.len()
                    ),
                    skipped: false,
                },
                TableStatus::Skipped(err) => TableEntry {
                    name: table.table.clone(),
                    detail: render_error(err),
                    skipped: true,
                },
            })
            .collect();
        Self {
            output_dir: output_dir.to_path_buf(),
            tables,
            files: file_counts(&report.stats),
            kept: report.stats.skipped.clone(),
        }
    }
}

impl Report for CrudSummary {
    fn render(&self, out: &mut dyn Output) {
        out.section("Tables");
        for table in &self.tables {
            if table.skipped {
                out.skipped_item(&format!("{} (skipped)", table.name));
            } else {
                out.added_item(&format!("{} ({})", table.name, table.detail));
            }
        }

        for table in self.tables.iter().filter(|t| t.skipped) {
            out.newline();
            out.error(&table.detail);
        }

        if !self.kept.is_empty() {
            out.newline();
            out.section("Kept existing files (use --overwrite to replace)");
            for path in &self.kept {
                out.list_item(path);
            }
        }

        out.newline();
        out.key_value("Generated", &self.output_dir.display().to_string());
        out.key_value("Files", &self.files);
    }
}
