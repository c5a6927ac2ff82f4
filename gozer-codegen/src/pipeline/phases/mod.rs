//! Built-in pipeline phases.

mod lower;
mod validate;

pub use lower::LowerPhase;
pub use validate::{DuplicateRouteLint, EmptyGroupLint, Lint, UndocumentedRouteLint, ValidatePhase};
