//! Code generation outputs and file management.
//!
//! - [`ArtifactRegistry`] - declarative artifact registration and writing
//! - [`GoImports`] - Go import grouping and deduplication
//! - [`AggregateDescriptor`] - umbrella descriptor parsing and merging
//! - [`ProtoDescriptor`] - structural merge of per-service proto files
//! - [`backup_and_sweep`] - spec backups with stale-copy cleanup

mod backup;
mod descriptor;
mod imports;
mod proto_merge;
mod registry;

pub use backup::{BACKUP_DIR_NAME, BACKUP_RETENTION_DAYS, backup_and_sweep, reformat_spec};
pub use descriptor::AggregateDescriptor;
pub use imports::GoImports;
pub use proto_merge::ProtoDescriptor;
pub use registry::{Artifact, ArtifactRegistry, PreviewEntry, WriteStats};
