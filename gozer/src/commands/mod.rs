mod api;
mod check;
mod completions;
mod crud;

use std::path::{Path, PathBuf};

use api::ApiCommand;
use check::CheckCommand;
use clap::{ArgAction, Args, Parser, Subcommand};
use completions::CompletionsCommand;
use crud::CrudCommand;
use eyre::Result;
use gozer_codegen_go::GoSettings;
use gozer_spec::{CONFIG_FILE_NAME, GenConfig, GozerToml};

/// Extension trait for exiting on spec and configuration errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for gozer_spec::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for gozer_codegen::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                match *e {
                    gozer_codegen::Error::Spec(inner) => {
                        eprintln!("{:?}", miette::Report::new(*inner))
                    }
                    other => eprintln!("{:?}", miette::Report::new(other)),
                }
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "gozer")]
#[command(version)]
#[command(about = "Scaffold go-zero services from route specs and table schemas")]
pub(crate) struct Cli {
    /// Log more (-v for info, -vv for debug); GOZER_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Api(cmd) => cmd.run(),
            Commands::Crud(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate handlers, logic, types and routes from service specs
    Api(ApiCommand),

    /// Generate CRUD logic, models and proto descriptors from a table schema
    Crud(CrudCommand),

    /// Validate service specs without generating code
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Options shared by the generating subcommands; each overrides `gozer.toml`.
#[derive(Args)]
pub(crate) struct GenArgs {
    /// Path to gozer.toml (defaults to gozer.toml next to the inputs)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root of the Go service
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// File and field naming: snake, camel, lower_camel or unchanged
    #[arg(long)]
    pub naming_format: Option<String>,

    /// Go module path (read from go.mod when omitted)
    #[arg(long)]
    pub module: Option<String>,

    /// Service-context field of the RPC client, e.g. CoreRpc
    #[arg(long)]
    pub rpc_name: Option<String>,

    /// Wire a Casbin enforcer into the service context
    #[arg(long)]
    pub casbin: bool,

    /// Wire an i18n translator into the service context
    #[arg(long)]
    pub i18n: bool,

    /// Translate handler errors through the i18n translator
    #[arg(long)]
    pub trans_err: bool,
}

impl GenArgs {
    /// Load the configuration next to `input_dir` and apply the flags.
    pub fn load_config(&self, input_dir: &Path) -> GenConfig {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| input_dir.join(CONFIG_FILE_NAME));
        let mut config = GozerToml::load_or_default(&path).unwrap_or_exit().generate;

        if let Some(format) = &self.naming_format {
            config.naming_format = format.clone();
        }
        if let Some(module) = &self.module {
            config.module_path = Some(module.clone());
        }
        if let Some(rpc_name) = &self.rpc_name {
            config.rpc_name = Some(rpc_name.clone());
        }
        config.use_casbin |= self.casbin;
        config.use_i18n |= self.i18n;
        config.trans_err |= self.trans_err;
        config
    }

    pub fn settings(&self, config: &GenConfig) -> GoSettings {
        GoSettings::resolve(config, &self.output).unwrap_or_exit()
    }
}
