//! IR construction pipeline for route specs.
//!
//! A [`Pipeline`] runs its phases over one parsed [`gozer_spec::ServiceSpec`]:
//!
//! - `ValidatePhase` runs lints and records warnings
//! - `LowerPhase` resolves group policies, names and types into a
//!   [`gozer_ir::ServiceIR`]
//!
//! Problems confined to one group are recorded as diagnostics and the
//! group is left out of the IR. Only fatal problems make [`Pipeline::run`]
//! fail.
//!
//! # Example
//!
//! ```ignore
//! let ctx = Pipeline::new().run(spec, "user", LowerOptions::default())?;
//! for diag in ctx.errors() {
//!     eprintln!("{}", diag);
//! }
//! let ir = ctx.ir.expect("lowered");
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod runner;

pub use context::{CompilationContext, LowerOptions};
pub use diagnostic::{Diagnostic, Severity};
pub use phase::Phase;
pub use runner::Pipeline;
