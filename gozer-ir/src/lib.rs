//! Intermediate representation types for the gozer scaffolder.
//!
//! # Architecture
//!
//! ```text
//! *.toml / schema.json → gozer-spec (parsing) → gozer-ir (normalized IR) → emitters
//! ```
//!
//! IR values are built fresh for every invocation and never persisted.
//! They carry only resolved facts: every name is already converted, every
//! annotation already validated, every column already mapped.

mod policy;
mod service;
mod table;
mod types;

pub use policy::{AuthPolicy, EffectiveGroupPolicy, SERVICE_CONTEXT_ACCESSOR};
pub use service::{GroupIR, RouteIR, ServiceIR, TypeFieldIR, TypeIR};
pub use table::{FieldIR, KeyMode, TableIR};
pub use types::{ArtifactKind, Coercion, GoType, HttpMethod, MappedType, OperationKind, ScalarType};
