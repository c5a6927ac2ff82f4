use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result, bail};
use gozer_codegen::classifier::Classifier;
use gozer_codegen_go::ApiGenerator;

use super::{GenArgs, UnwrapOrExit};
use crate::reports::{ApiPreview, ApiSummary, Report, TerminalOutput};

#[derive(Args)]
pub struct ApiCommand {
    /// Directory holding the service spec files
    #[arg(default_value = "desc")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub args: GenArgs,

    /// Leave spec files as they are instead of reformatting them
    #[arg(long)]
    pub no_format: bool,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Where spec files are backed up before reformatting (defaults to the temp directory)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,
}

impl ApiCommand {
    /// Run the api command
    pub fn run(&self) -> Result<()> {
        let mut config = self.args.load_config(&self.dir);
        if self.no_format {
            config.format_spec = false;
        }
        let settings = self.args.settings(&config);

        let files = ApiGenerator::spec_files(&self.dir).unwrap_or_exit();
        if files.is_empty() {
            bail!("no service spec found in {}", self.dir.display());
        }

        let classifier = Classifier::from_config(&config.classify);
        let mut generator = ApiGenerator::new(settings).with_classifier(classifier);
        if let Some(dir) = &self.backup_dir {
            generator = generator.with_backup_dir(dir);
        }
        if self.dry_run {
            let files = generator.preview(&files);
            ApiPreview { files }.render(&mut TerminalOutput::new());
            return Ok(());
        }

        let report = generator
            .generate(&files, &self.args.output)
            .wrap_err("Failed to generate service code")?;

        ApiSummary::new(&self.args.output, &report).render(&mut TerminalOutput::new());
        if report.has_failures() {
            std::process::exit(1);
        }
        Ok(())
    }
}
