use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;
use gozer_codegen::classifier::Classifier;
use gozer_codegen_go::{ApiGenerator, GoSettings};
use gozer_spec::{CONFIG_FILE_NAME, GozerToml};

use super::UnwrapOrExit;
use crate::reports::{CheckReport, Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Directory holding the service spec files
    #[arg(default_value = "desc")]
    pub dir: PathBuf,

    /// Path to gozer.toml (defaults to gozer.toml in the spec directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| self.dir.join(CONFIG_FILE_NAME));
        let config = GozerToml::load_or_default(&path).unwrap_or_exit().generate;
        let settings = GoSettings::resolve(&config, Path::new(".")).unwrap_or_exit();

        let files = ApiGenerator::spec_files(&self.dir).unwrap_or_exit();
        let outcomes = ApiGenerator::new(settings)
            .with_classifier(Classifier::from_config(&config.classify))
            .check(&files);

        let report = CheckReport::new(&self.dir, &outcomes);
        report.render(&mut TerminalOutput::new());
        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
