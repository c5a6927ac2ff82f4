//! Go/go-zero emitter for the gozer scaffolder.
//!
//! Every output file has its own type in [`files`] implementing
//! [`gozer_core::GeneratedFile`]. The generators lower inputs through
//! `gozer-codegen`, render those files into an artifact registry and write
//! the registry with the overwrite rules of their mode.

mod generator;
mod go_file;
mod settings;
mod templates;

pub mod files;

pub use generator::{
    ApiGenerator, ApiReport, CrudGenerator, CrudReport, SpecOutcome, SpecStatus, TableOutcome,
    TableStatus,
};
pub use go_file::GoFile;
pub use settings::{GoSettings, RpcClient, read_module_path};
pub use templates::{CrudOperation, Templates};
