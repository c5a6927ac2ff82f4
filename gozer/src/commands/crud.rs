use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result};
use gozer_codegen_go::CrudGenerator;
use gozer_spec::SchemaConfig;

use super::{GenArgs, UnwrapOrExit};
use crate::reports::{CrudSummary, Report, TerminalOutput};

#[derive(Args)]
pub struct CrudCommand {
    /// Table schema (.json or .toml)
    pub schema: PathBuf,

    #[command(flatten)]
    pub args: GenArgs,

    /// Rewrite logic and model files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Generate UUID helpers for UUID-keyed tables
    #[arg(long)]
    pub uuid: bool,

    /// Maximum number of string columns used as list filters
    #[arg(long)]
    pub search_key_num: Option<usize>,

    /// Package declared in the proto descriptors
    #[arg(long)]
    pub proto_package: Option<String>,

    /// Go package holding the gorm models
    #[arg(long)]
    pub model_package: Option<String>,
}

impl CrudCommand {
    /// Run the crud command
    pub fn run(&self) -> Result<()> {
        let schema_dir = self.schema.parent().unwrap_or(Path::new("."));
        let mut config = self.args.load_config(schema_dir);
        config.overwrite |= self.overwrite;
        config.use_uuid |= self.uuid;
        if let Some(num) = self.search_key_num {
            config.search_key_num = num;
        }
        if let Some(package) = &self.proto_package {
            config.proto_package = Some(package.clone());
        }
        if let Some(package) = &self.model_package {
            config.model_package = package.clone();
        }
        let settings = self.args.settings(&config);

        let schema = SchemaConfig::from_file(&self.schema).unwrap_or_exit();
        let report = CrudGenerator::new(settings)
            .generate(&schema, &self.args.output)
            .wrap_err("Failed to generate CRUD code")?;

        CrudSummary::new(&self.args.output, &report).render(&mut TerminalOutput::new());
        Ok(())
    }
}
